//! Concatenation and soundtrack planning.
//!
//! Turns opened handles into a [`Composition`]: the ordered segments, the
//! output canvas, and the optional soundtrack. Rendering the composition is
//! the backend's job.

use std::path::PathBuf;

use super::types::{AudioHandle, ClipHandle, MediaError, MediaResult};

/// How clips with different encoding parameters are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositingMode {
    /// Centre every clip on a canvas large enough for all of them.
    #[default]
    Compose,
}

/// Output frame geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// One clip placed in the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub path: PathBuf,
    /// Start offset in the output, in seconds.
    pub start: f64,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub has_audio: bool,
}

/// Audio replacing the clips' own sound.
#[derive(Debug, Clone, PartialEq)]
pub struct Soundtrack {
    pub path: PathBuf,
    /// Seconds of the file that are used.
    pub duration: f64,
    /// Whether the file was cut to the video length.
    pub truncated: bool,
}

/// Concatenated clips plus optional soundtrack.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub segments: Vec<Segment>,
    pub canvas: Canvas,
    pub soundtrack: Option<Soundtrack>,
}

impl Composition {
    /// Total video duration in seconds.
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Whether the output carries any audio stream.
    pub fn has_audio(&self) -> bool {
        self.soundtrack.is_some() || self.segments.iter().any(|s| s.has_audio)
    }
}

/// Join clips end to end in the given order.
pub fn concatenate(clips: &[ClipHandle], mode: CompositingMode) -> MediaResult<Composition> {
    if clips.is_empty() {
        return Err(MediaError::EmptyComposition);
    }

    let canvas = match mode {
        CompositingMode::Compose => {
            let width = clips.iter().map(|c| c.video.width).max().unwrap_or(0);
            let height = clips.iter().map(|c| c.video.height).max().unwrap_or(0);
            let fps = clips.iter().map(|c| c.video.fps).fold(0.0_f64, f64::max);
            Canvas {
                width: round_up_even(width),
                height: round_up_even(height),
                fps,
            }
        }
    };

    let mut start = 0.0;
    let segments = clips
        .iter()
        .map(|clip| {
            let segment = Segment {
                path: clip.path.clone(),
                start,
                duration: clip.duration,
                width: clip.video.width,
                height: clip.video.height,
                has_audio: clip.has_audio,
            };
            start += clip.duration;
            segment
        })
        .collect();

    Ok(Composition {
        segments,
        canvas,
        soundtrack: None,
    })
}

/// Use `audio` as the composition's only sound.
///
/// Audio longer than the video is cut to exactly the video duration; the
/// video is never shortened to fit the audio.
pub fn attach_audio(mut composition: Composition, audio: &AudioHandle) -> Composition {
    let video_duration = composition.duration();
    let truncated = audio.duration > video_duration;
    let duration = if truncated {
        video_duration
    } else {
        audio.duration
    };

    composition.soundtrack = Some(Soundtrack {
        path: audio.path.clone(),
        duration,
        truncated,
    });
    composition
}

/// 4:2:0 chroma subsampling needs even dimensions.
fn round_up_even(value: u32) -> u32 {
    value + (value % 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::types::VideoProperties;

    fn clip(name: &str, duration: f64, width: u32, height: u32, fps: f64) -> ClipHandle {
        ClipHandle {
            path: PathBuf::from(name),
            duration,
            video: VideoProperties { width, height, fps },
            has_audio: true,
        }
    }

    fn audio(duration: f64) -> AudioHandle {
        AudioHandle {
            path: PathBuf::from("music.mp3"),
            duration,
        }
    }

    #[test]
    fn compose_uses_largest_frame_and_rate() {
        let clips = vec![
            clip("a.mp4", 2.0, 1280, 720, 30.0),
            clip("b.mov", 3.0, 1920, 1080, 25.0),
            clip("c.mkv", 1.5, 640, 1137, 59.94),
        ];

        let comp = concatenate(&clips, CompositingMode::Compose).unwrap();

        assert_eq!(comp.canvas.width, 1920);
        assert_eq!(comp.canvas.height, 1138);
        assert!((comp.canvas.fps - 59.94).abs() < 1e-9);
    }

    #[test]
    fn segments_keep_order_and_offsets() {
        let clips = vec![
            clip("a.mp4", 2.0, 640, 480, 30.0),
            clip("b.mp4", 3.0, 640, 480, 30.0),
            clip("a.mp4", 1.0, 640, 480, 30.0),
        ];

        let comp = concatenate(&clips, CompositingMode::Compose).unwrap();
        let starts: Vec<f64> = comp.segments.iter().map(|s| s.start).collect();
        let paths: Vec<_> = comp.segments.iter().map(|s| s.path.clone()).collect();

        assert_eq!(starts, vec![0.0, 2.0, 5.0]);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.mp4"),
                PathBuf::from("b.mp4"),
                PathBuf::from("a.mp4")
            ]
        );
        assert!((comp.duration() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn portrait_and_landscape_share_a_square_canvas() {
        let clips = vec![
            clip("landscape.mp4", 2.0, 1920, 1080, 30.0),
            clip("portrait.mp4", 2.0, 1080, 1920, 30.0),
        ];

        let comp = concatenate(&clips, CompositingMode::Compose).unwrap();

        assert_eq!((comp.canvas.width, comp.canvas.height), (1920, 1920));
        assert!(comp
            .segments
            .iter()
            .all(|s| s.width <= comp.canvas.width && s.height <= comp.canvas.height));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = concatenate(&[], CompositingMode::Compose).unwrap_err();
        assert!(matches!(err, MediaError::EmptyComposition));
    }

    #[test]
    fn long_audio_is_truncated_to_video() {
        let clips = vec![
            clip("1.mp4", 4.0, 640, 480, 30.0),
            clip("2.mp4", 5.5, 640, 480, 30.0),
            clip("3.mp4", 2.5, 640, 480, 30.0),
        ];
        let comp = concatenate(&clips, CompositingMode::Compose).unwrap();

        let comp = attach_audio(comp, &audio(60.0));
        let track = comp.soundtrack.as_ref().unwrap();

        assert!(track.truncated);
        assert!((track.duration - 12.0).abs() < 1e-9);
        // Video keeps its full length
        assert!((comp.duration() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn short_audio_is_kept_whole() {
        let clips = vec![clip("1.mp4", 10.0, 640, 480, 30.0)];
        let comp = concatenate(&clips, CompositingMode::Compose).unwrap();

        let comp = attach_audio(comp, &audio(7.25));
        let track = comp.soundtrack.as_ref().unwrap();

        assert!(!track.truncated);
        assert!((track.duration - 7.25).abs() < 1e-9);
        assert!((comp.duration() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn audio_equal_to_video_is_not_truncated() {
        let clips = vec![clip("1.mp4", 3.0, 640, 480, 30.0)];
        let comp = attach_audio(
            concatenate(&clips, CompositingMode::Compose).unwrap(),
            &audio(3.0),
        );
        assert!(!comp.soundtrack.unwrap().truncated);
    }

    #[test]
    fn round_up_even_pads_odd_values() {
        assert_eq!(round_up_even(719), 720);
        assert_eq!(round_up_even(720), 720);
    }
}
