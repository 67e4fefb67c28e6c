//! Export job snapshot.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::Local;
use uuid::Uuid;

use super::errors::ExportRejected;
use crate::playlist::Playlist;

/// Extension used when the chosen destination has none.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Immutable input of one export, captured when the user triggers it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    id: Uuid,
    name: String,
    clips: Vec<PathBuf>,
    audio: Option<PathBuf>,
    destination: PathBuf,
}

impl ExportJob {
    /// Snapshot `playlist` into a job writing to `destination`.
    pub fn prepare(
        playlist: &Playlist,
        destination: Option<PathBuf>,
    ) -> Result<Self, ExportRejected> {
        if playlist.is_empty() {
            return Err(ExportRejected::NoClips);
        }
        let destination = destination
            .filter(|d| !d.as_os_str().is_empty())
            .ok_or(ExportRejected::NoDestination)?;

        let id = Uuid::new_v4();
        let short_id: String = id.simple().to_string().chars().take(8).collect();
        let name = format!(
            "export_{}_{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            short_id
        );

        Ok(Self {
            id,
            name,
            clips: playlist.clips().to_vec(),
            audio: playlist.audio().map(Path::to_path_buf),
            destination: with_default_extension(destination),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name used for the per-export log file.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clips(&self) -> &[PathBuf] {
        &self.clips
    }

    pub fn audio(&self) -> Option<&Path> {
        self.audio.as_deref()
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Where the encoder writes before the final rename.
    pub fn partial_path(&self) -> PathBuf {
        partial_path(&self.destination)
    }
}

/// Append `.mp4` to a path that has no extension.
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

/// Hidden sibling of `destination`: `dir/.name.partial.ext`.
pub fn partial_path(destination: &Path) -> PathBuf {
    let stem = destination
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    let ext = destination
        .extension()
        .map(|e| e.to_os_string())
        .unwrap_or_else(|| OsString::from(DEFAULT_EXTENSION));

    let mut name = OsString::from(".");
    name.push(&stem);
    name.push(".partial.");
    name.push(&ext);

    destination.with_file_name(name)
}
