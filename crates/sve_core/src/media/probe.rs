//! File probing using ffprobe JSON output.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use super::types::{AudioHandle, ClipHandle, MediaError, MediaResult, VideoProperties};

/// Run ffprobe on `path` and return its parsed JSON output.
pub fn run_ffprobe(ffprobe: &str, path: &Path) -> MediaResult<Value> {
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    tracing::debug!("Probing file: {}", path.display());

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| MediaError::ToolNotFound {
            tool: ffprobe.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::probe_failed(path, stderr.trim()));
    }

    serde_json::from_slice(&output.stdout)
        .map_err(|e| MediaError::parse("ffprobe output", e.to_string()))
}

/// Build a clip handle from ffprobe JSON.
pub fn parse_clip(json: &Value, path: &Path) -> MediaResult<ClipHandle> {
    let streams = streams(json);

    let video = streams
        .iter()
        .find(|s| codec_type(s) == Some("video") && !is_attached_picture(s))
        .ok_or_else(|| MediaError::NoVideoStream(path.to_path_buf()))?;

    let coded_width = video.get("width").and_then(Value::as_u64).unwrap_or(0) as u32;
    let coded_height = video.get("height").and_then(Value::as_u64).unwrap_or(0) as u32;
    if coded_width == 0 || coded_height == 0 {
        return Err(MediaError::probe_failed(path, "video stream has no dimensions"));
    }

    // ffmpeg autorotates on decode, so quarter turns swap the displayed size
    let (width, height) = match rotation_of(video) {
        90 | 270 => (coded_height, coded_width),
        _ => (coded_width, coded_height),
    };

    let fps = ["avg_frame_rate", "r_frame_rate"]
        .iter()
        .filter_map(|key| video.get(*key).and_then(Value::as_str))
        .find_map(parse_frame_rate)
        .ok_or_else(|| MediaError::probe_failed(path, "video stream has no frame rate"))?;

    let duration = duration_of(json, video)
        .ok_or_else(|| MediaError::probe_failed(path, "duration unknown"))?;

    let has_audio = streams.iter().any(|s| codec_type(s) == Some("audio"));

    Ok(ClipHandle {
        path: path.to_path_buf(),
        duration,
        video: VideoProperties { width, height, fps },
        has_audio,
    })
}

/// Build an audio handle from ffprobe JSON.
pub fn parse_audio(json: &Value, path: &Path) -> MediaResult<AudioHandle> {
    let streams = streams(json);

    let audio = streams
        .iter()
        .find(|s| codec_type(s) == Some("audio"))
        .ok_or_else(|| MediaError::NoAudioStream(path.to_path_buf()))?;

    let duration = duration_of(json, audio)
        .ok_or_else(|| MediaError::probe_failed(path, "duration unknown"))?;

    Ok(AudioHandle {
        path: path.to_path_buf(),
        duration,
    })
}

/// Parse an ffprobe rational like `30000/1001`.
///
/// Returns `None` for zero or malformed rates (`0/0` is common for
/// streams without a fixed rate).
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

fn streams(json: &Value) -> Vec<&Value> {
    json.get("streams")
        .and_then(Value::as_array)
        .map(|s| s.iter().collect())
        .unwrap_or_default()
}

fn codec_type(stream: &Value) -> Option<&str> {
    stream.get("codec_type").and_then(Value::as_str)
}

// Cover art in audio files shows up as a video stream
fn is_attached_picture(stream: &Value) -> bool {
    stream
        .get("disposition")
        .and_then(|d| d.get("attached_pic"))
        .and_then(Value::as_i64)
        .unwrap_or(0)
        == 1
}

/// Display rotation in degrees, normalised to `0..360`.
///
/// Newer ffprobe reports it in the display matrix side data, older builds
/// as a `rotate` tag.
fn rotation_of(stream: &Value) -> i64 {
    let from_side_data = stream
        .get("side_data_list")
        .and_then(Value::as_array)
        .and_then(|list| {
            list.iter()
                .find_map(|entry| entry.get("rotation").and_then(Value::as_f64))
        });
    let from_tags = || {
        stream
            .get("tags")
            .and_then(|t| t.get("rotate"))
            .and_then(Value::as_str)
            .and_then(|r| r.trim().parse::<f64>().ok())
    };

    let degrees = from_side_data.or_else(from_tags).unwrap_or(0.0).round() as i64;
    degrees.rem_euclid(360)
}

/// Container duration, falling back to the stream's own.
fn duration_of(json: &Value, stream: &Value) -> Option<f64> {
    let parse = |v: &Value| {
        v.get("duration")
            .and_then(Value::as_str)
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0)
    };
    json.get("format").and_then(parse).or_else(|| parse(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clip_json() -> Value {
        json!({
            "streams": [
                {
                    "index": 0,
                    "codec_type": "video",
                    "width": 1920,
                    "height": 1080,
                    "avg_frame_rate": "30000/1001",
                    "r_frame_rate": "30000/1001",
                    "duration": "10.010000"
                },
                { "index": 1, "codec_type": "audio", "duration": "10.005000" }
            ],
            "format": { "duration": "10.010000" }
        })
    }

    #[test]
    fn parses_clip_properties() {
        let clip = parse_clip(&clip_json(), Path::new("a.mp4")).unwrap();
        assert_eq!(clip.video.width, 1920);
        assert_eq!(clip.video.height, 1080);
        assert!((clip.video.fps - 29.97).abs() < 0.01);
        assert!((clip.duration - 10.01).abs() < 1e-9);
        assert!(clip.has_audio);
    }

    #[test]
    fn falls_back_to_stream_duration_and_r_frame_rate() {
        let json = json!({
            "streams": [{
                "codec_type": "video",
                "width": 640,
                "height": 480,
                "avg_frame_rate": "0/0",
                "r_frame_rate": "25/1",
                "duration": "4.0"
            }],
            "format": {}
        });

        let clip = parse_clip(&json, Path::new("b.avi")).unwrap();
        assert!((clip.video.fps - 25.0).abs() < 1e-9);
        assert!((clip.duration - 4.0).abs() < 1e-9);
        assert!(!clip.has_audio);
    }

    #[test]
    fn audio_only_file_is_not_a_clip() {
        let json = json!({
            "streams": [
                { "codec_type": "audio" },
                {
                    "codec_type": "video",
                    "width": 500,
                    "height": 500,
                    "r_frame_rate": "90000/1",
                    "disposition": { "attached_pic": 1 }
                }
            ],
            "format": { "duration": "180.5" }
        });

        let err = parse_clip(&json, Path::new("song.mp3")).unwrap_err();
        assert!(matches!(err, MediaError::NoVideoStream(_)));

        let audio = parse_audio(&json, Path::new("song.mp3")).unwrap();
        assert!((audio.duration - 180.5).abs() < 1e-9);
    }

    #[test]
    fn audio_requires_audio_stream() {
        let json = json!({
            "streams": [{ "codec_type": "video", "width": 2, "height": 2, "r_frame_rate": "1/1" }],
            "format": { "duration": "1.0" }
        });
        let err = parse_audio(&json, Path::new("silent.mp4")).unwrap_err();
        assert!(matches!(err, MediaError::NoAudioStream(_)));
    }

    fn portrait_json(rotation: Value) -> Value {
        json!({
            "streams": [{
                "codec_type": "video",
                "width": 1920,
                "height": 1080,
                "r_frame_rate": "30/1",
                "side_data_list": [
                    { "side_data_type": "Display Matrix", "rotation": rotation }
                ]
            }],
            "format": { "duration": "5.0" }
        })
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        for rotation in [json!(-90), json!(90), json!(270)] {
            let clip = parse_clip(&portrait_json(rotation), Path::new("phone.mp4")).unwrap();
            assert_eq!((clip.video.width, clip.video.height), (1080, 1920));
        }

        let clip = parse_clip(&portrait_json(json!(180)), Path::new("flipped.mp4")).unwrap();
        assert_eq!((clip.video.width, clip.video.height), (1920, 1080));
    }

    #[test]
    fn rotate_tag_is_honoured() {
        let json = json!({
            "streams": [{
                "codec_type": "video",
                "width": 1280,
                "height": 720,
                "r_frame_rate": "30/1",
                "tags": { "rotate": "90" }
            }],
            "format": { "duration": "3.0" }
        });

        let clip = parse_clip(&json, Path::new("old_phone.mov")).unwrap();
        assert_eq!((clip.video.width, clip.video.height), (720, 1280));
    }

    #[test]
    fn rotated_clip_fits_the_canvas() {
        use crate::media::compose::{concatenate, CompositingMode};

        let landscape = parse_clip(&clip_json(), Path::new("a.mp4")).unwrap();
        let portrait = parse_clip(&portrait_json(json!(-90)), Path::new("phone.mp4")).unwrap();

        let comp = concatenate(&[landscape, portrait], CompositingMode::Compose).unwrap();
        assert_eq!((comp.canvas.width, comp.canvas.height), (1920, 1920));
    }

    #[test]
    fn frame_rate_parsing() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("24"), Some(24.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = run_ffprobe("ffprobe", Path::new("/nonexistent/clip.mp4")).unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
