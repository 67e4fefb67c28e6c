//! Playlist model: the ordered clip list and the optional music track.
//!
//! Lives only in memory for the session. The interface renders the list
//! straight from [`Playlist::display_names`], so what the user sees is always
//! the model order.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from playlist edits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    /// The index does not point at a clip (nothing selected).
    #[error("No clip selected")]
    NothingSelected,
}

/// Ordered clips plus one optional audio path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    clips: Vec<PathBuf>,
    audio: Option<PathBuf>,
}

impl Playlist {
    /// Create an empty playlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append clips to the end, keeping the given order.
    ///
    /// Returns the number of clips added (zero for empty input).
    pub fn add_clips<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let before = self.clips.len();
        self.clips.extend(paths.into_iter().map(Into::into));
        self.clips.len() - before
    }

    /// Remove the clip at `index` and return it.
    pub fn remove_at(&mut self, index: Option<usize>) -> Result<PathBuf, PlaylistError> {
        let idx = self.checked(index)?;
        Ok(self.clips.remove(idx))
    }

    /// Swap the clip at `index` with its predecessor.
    ///
    /// Returns the clip's new index. At the top of the list nothing changes
    /// and the same index comes back.
    pub fn move_up(&mut self, index: Option<usize>) -> Result<usize, PlaylistError> {
        let idx = self.checked(index)?;
        if idx == 0 {
            return Ok(idx);
        }
        self.clips.swap(idx, idx - 1);
        Ok(idx - 1)
    }

    /// Swap the clip at `index` with its successor.
    ///
    /// Returns the clip's new index. At the bottom of the list nothing
    /// changes and the same index comes back.
    pub fn move_down(&mut self, index: Option<usize>) -> Result<usize, PlaylistError> {
        let idx = self.checked(index)?;
        if idx + 1 == self.clips.len() {
            return Ok(idx);
        }
        self.clips.swap(idx, idx + 1);
        Ok(idx + 1)
    }

    /// Replace the music track.
    pub fn set_audio(&mut self, path: impl Into<PathBuf>) {
        self.audio = Some(path.into());
    }

    /// Clear the music track.
    pub fn clear_audio(&mut self) {
        self.audio = None;
    }

    pub fn clips(&self) -> &[PathBuf] {
        &self.clips
    }

    pub fn audio(&self) -> Option<&Path> {
        self.audio.as_deref()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Names shown in the clip list, in playlist order.
    pub fn display_names(&self) -> Vec<String> {
        self.clips.iter().map(|p| display_name(p)).collect()
    }

    /// Name shown in the music slot, if any.
    pub fn audio_display_name(&self) -> Option<String> {
        self.audio.as_deref().map(display_name)
    }

    fn checked(&self, index: Option<usize>) -> Result<usize, PlaylistError> {
        match index {
            Some(idx) if idx < self.clips.len() => Ok(idx),
            _ => Err(PlaylistError::NothingSelected),
        }
    }
}

/// File name of a path, falling back to the whole path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(names: &[&str]) -> Playlist {
        let mut p = Playlist::new();
        p.add_clips(names.iter().map(|n| format!("/videos/{}", n)));
        p
    }

    fn assert_in_sync(p: &Playlist) {
        let from_model: Vec<String> = p.clips().iter().map(|c| display_name(c)).collect();
        assert_eq!(p.display_names(), from_model);
    }

    #[test]
    fn add_appends_in_order() {
        let mut p = playlist(&["a.mp4"]);
        let added = p.add_clips(["/videos/b.mp4", "/videos/c.mp4"]);

        assert_eq!(added, 2);
        assert_eq!(p.display_names(), vec!["a.mp4", "b.mp4", "c.mp4"]);
    }

    #[test]
    fn add_empty_is_noop() {
        let mut p = playlist(&["a.mp4"]);
        let added = p.add_clips(Vec::<PathBuf>::new());

        assert_eq!(added, 0);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn duplicates_are_independent_entries() {
        let mut p = playlist(&["a.mp4", "a.mp4"]);
        assert_eq!(p.len(), 2);

        p.remove_at(Some(0)).unwrap();
        assert_eq!(p.display_names(), vec!["a.mp4"]);
    }

    #[test]
    fn move_up_at_top_is_noop() {
        let mut p = playlist(&["a.mp4", "b.mp4"]);
        let before = p.clone();

        assert_eq!(p.move_up(Some(0)), Ok(0));
        assert_eq!(p, before);
    }

    #[test]
    fn move_down_at_bottom_is_noop() {
        let mut p = playlist(&["a.mp4", "b.mp4"]);
        let before = p.clone();

        assert_eq!(p.move_down(Some(1)), Ok(1));
        assert_eq!(p, before);
    }

    #[test]
    fn move_down_swaps_with_next() {
        let mut p = playlist(&["a.mp4", "b.mp4", "c.mp4"]);

        assert_eq!(p.move_down(Some(0)), Ok(1));
        assert_eq!(p.display_names(), vec!["b.mp4", "a.mp4", "c.mp4"]);
    }

    #[test]
    fn remove_without_selection_leaves_list() {
        let mut p = playlist(&["a.mp4", "b.mp4"]);
        let before = p.clone();

        assert_eq!(p.remove_at(None), Err(PlaylistError::NothingSelected));
        assert_eq!(p.remove_at(Some(5)), Err(PlaylistError::NothingSelected));
        assert_eq!(p, before);
    }

    #[test]
    fn moves_without_selection_report_nothing_selected() {
        let mut p = playlist(&["a.mp4"]);
        assert_eq!(p.move_up(None), Err(PlaylistError::NothingSelected));
        assert_eq!(p.move_down(Some(3)), Err(PlaylistError::NothingSelected));
    }

    #[test]
    fn move_then_remove_scenario() {
        let mut p = playlist(&["A.mp4", "B.mp4"]);

        assert_eq!(p.move_up(Some(1)), Ok(0));
        assert_eq!(p.display_names(), vec!["B.mp4", "A.mp4"]);

        let removed = p.remove_at(Some(0)).unwrap();
        assert_eq!(removed, PathBuf::from("/videos/B.mp4"));
        assert_eq!(p.display_names(), vec!["A.mp4"]);
    }

    #[test]
    fn display_stays_in_lockstep_through_edits() {
        let mut p = Playlist::new();
        assert_in_sync(&p);

        p.add_clips(["/v/1.mp4", "/v/2.mov", "/v/3.mkv", "/v/4.avi"]);
        assert_in_sync(&p);
        p.move_down(Some(0)).unwrap();
        assert_in_sync(&p);
        p.move_up(Some(3)).unwrap();
        assert_in_sync(&p);
        p.remove_at(Some(1)).unwrap();
        assert_in_sync(&p);
        p.move_down(Some(2)).unwrap();
        assert_in_sync(&p);

        assert_eq!(p.display_names(), vec!["2.mov", "4.avi", "3.mkv"]);
    }

    #[test]
    fn audio_slot_replaces_and_clears() {
        let mut p = Playlist::new();
        assert!(p.audio().is_none());

        p.set_audio("/music/one.mp3");
        p.set_audio("/music/two.ogg");
        assert_eq!(p.audio_display_name().as_deref(), Some("two.ogg"));

        p.clear_audio();
        assert!(p.audio().is_none());
    }
}
