//! FFmpeg-backed media backend.
//!
//! Opening is an `ffprobe` call; writing is one `ffmpeg -filter_complex`
//! invocation that pads, concatenates and muxes in a single pass.

use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use super::compose::Composition;
use super::probe;
use super::types::{AudioHandle, ClipHandle, ExportCodecs, MediaError, MediaResult};
use super::MediaBackend;
use crate::config::ToolSettings;
use crate::logging::ExportLogger;

/// Sample rate every clip's audio is normalised to.
const AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Media backend driving the `ffmpeg` and `ffprobe` executables.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegBackend {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    pub fn from_settings(tools: &ToolSettings) -> Self {
        Self::new(&tools.ffmpeg_path, &tools.ffprobe_path)
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl MediaBackend for FfmpegBackend {
    fn open_clip(&self, path: &Path) -> MediaResult<ClipHandle> {
        let json = probe::run_ffprobe(&self.ffprobe, path)?;
        probe::parse_clip(&json, path)
    }

    fn open_audio(&self, path: &Path) -> MediaResult<AudioHandle> {
        let json = probe::run_ffprobe(&self.ffprobe, path)?;
        probe::parse_audio(&json, path)
    }

    fn write(
        &self,
        composition: &Composition,
        destination: &Path,
        codecs: ExportCodecs,
        logger: &ExportLogger,
    ) -> MediaResult<()> {
        let args = build_write_args(composition, destination, codecs);
        logger.command(&command_line(&self.ffmpeg, &args));

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MediaError::ToolNotFound {
                tool: self.ffmpeg.clone(),
                message: e.to_string(),
            })?;

        if let Some(stderr) = child.stderr.take() {
            for line in BufReader::new(stderr).lines() {
                match line {
                    Ok(line) if !line.trim().is_empty() => logger.output_line(line.trim_end()),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("Stopped reading ffmpeg output: {}", e);
                        break;
                    }
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| MediaError::io("waiting for ffmpeg", e))?;

        if !status.success() {
            let tail = logger.tail();
            let message = if tail.is_empty() {
                "no output".to_string()
            } else {
                tail.join("\n")
            };
            return Err(MediaError::CommandFailed {
                tool: "ffmpeg".to_string(),
                exit_code: status.code().unwrap_or(-1),
                message,
            });
        }

        Ok(())
    }
}

/// Build the full ffmpeg argument list for writing `composition`.
///
/// Paths are passed through as `OsString` so names that are not valid
/// UTF-8 reach ffmpeg unchanged.
pub fn build_write_args(
    composition: &Composition,
    destination: &Path,
    codecs: ExportCodecs,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error", "-nostdin"]
        .into_iter()
        .map(OsString::from)
        .collect();

    for segment in &composition.segments {
        args.push("-i".into());
        args.push(segment.path.clone().into_os_string());
    }
    if let Some(track) = &composition.soundtrack {
        args.push("-i".into());
        args.push(track.path.clone().into_os_string());
    }

    args.push("-filter_complex".into());
    args.push(build_filter_graph(composition).into());

    args.extend(["-map", "[outv]"].map(OsString::from));
    if composition.has_audio() {
        args.extend(["-map", "[outa]"].map(OsString::from));
    }

    args.extend(["-c:v", codecs.video, "-pix_fmt", "yuv420p"].map(OsString::from));
    if composition.has_audio() {
        args.extend(["-c:a", codecs.audio].map(OsString::from));
    }

    args.push(destination.as_os_str().to_os_string());
    args
}

/// Printable command line for the export log.
fn command_line(program: &str, args: &[OsString]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Build the `-filter_complex` graph.
///
/// Per-clip audio is only concatenated when there is no soundtrack and at
/// least one clip has sound; silent clips then get generated silence so the
/// concat filter sees matching streams.
pub fn build_filter_graph(composition: &Composition) -> String {
    let canvas = composition.canvas;
    let fps = format_number(canvas.fps);
    let clip_audio =
        composition.soundtrack.is_none() && composition.segments.iter().any(|s| s.has_audio);

    let mut chains = Vec::new();
    let mut concat_inputs = String::new();

    for (i, segment) in composition.segments.iter().enumerate() {
        chains.push(format!(
            "[{i}:v]setpts=PTS-STARTPTS,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1,fps={fps},format=yuv420p[v{i}]",
            w = canvas.width,
            h = canvas.height,
        ));
        concat_inputs.push_str(&format!("[v{i}]"));

        if clip_audio {
            let duration = format_number(segment.duration);
            if segment.has_audio {
                chains.push(format!(
                    "[{i}:a]aresample={AUDIO_SAMPLE_RATE},aformat=sample_fmts=fltp:channel_layouts=stereo,apad,atrim=duration={duration},asetpts=PTS-STARTPTS[a{i}]"
                ));
            } else {
                chains.push(format!(
                    "anullsrc=r={AUDIO_SAMPLE_RATE}:cl=stereo,atrim=duration={duration}[a{i}]"
                ));
            }
            concat_inputs.push_str(&format!("[a{i}]"));
        }
    }

    let n = composition.segments.len();
    if clip_audio {
        chains.push(format!("{concat_inputs}concat=n={n}:v=1:a=1[outv][outa]"));
    } else {
        chains.push(format!("{concat_inputs}concat=n={n}:v=1:a=0[outv]"));
    }

    if let Some(track) = &composition.soundtrack {
        chains.push(format!(
            "[{n}:a]atrim=duration={},asetpts=PTS-STARTPTS[outa]",
            format_number(track.duration)
        ));
    }

    chains.join(";")
}

/// Format a number with at most six decimals and no trailing zeros.
fn format_number(value: f64) -> String {
    let formatted = format!("{:.6}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::compose::{attach_audio, concatenate, CompositingMode};
    use crate::media::types::VideoProperties;
    use std::path::PathBuf;

    fn clip(name: &str, duration: f64, width: u32, height: u32, has_audio: bool) -> ClipHandle {
        ClipHandle {
            path: PathBuf::from(name),
            duration,
            video: VideoProperties {
                width,
                height,
                fps: 30.0,
            },
            has_audio,
        }
    }

    #[test]
    fn graph_pads_every_clip_to_canvas() {
        let comp = concatenate(
            &[
                clip("a.mp4", 2.0, 1280, 720, true),
                clip("b.mp4", 3.0, 1920, 1080, true),
            ],
            CompositingMode::Compose,
        )
        .unwrap();

        let graph = build_filter_graph(&comp);

        assert!(graph.contains(
            "[0:v]setpts=PTS-STARTPTS,pad=1920:1080:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1,fps=30,format=yuv420p[v0]"
        ));
        assert!(graph.contains("[1:v]setpts=PTS-STARTPTS,pad=1920:1080"));
        assert!(graph.ends_with("[v0][a0][v1][a1]concat=n=2:v=1:a=1[outv][outa]"));
    }

    #[test]
    fn silent_clips_get_generated_audio() {
        let comp = concatenate(
            &[
                clip("a.mp4", 2.5, 640, 480, true),
                clip("b.mp4", 1.0, 640, 480, false),
            ],
            CompositingMode::Compose,
        )
        .unwrap();

        let graph = build_filter_graph(&comp);

        assert!(graph.contains("[0:a]aresample=44100"));
        assert!(graph.contains("atrim=duration=2.5"));
        assert!(graph.contains("anullsrc=r=44100:cl=stereo,atrim=duration=1[a1]"));
    }

    #[test]
    fn all_silent_clips_have_no_audio_output() {
        let comp = concatenate(
            &[clip("a.mp4", 2.0, 640, 480, false)],
            CompositingMode::Compose,
        )
        .unwrap();

        let graph = build_filter_graph(&comp);
        let args = build_write_args(&comp, Path::new("out.mp4"), ExportCodecs::STANDARD);

        assert!(graph.ends_with("[v0]concat=n=1:v=1:a=0[outv]"));
        assert!(!args.contains(&OsString::from("[outa]")));
        assert!(!args.contains(&OsString::from("-c:a")));
    }

    #[test]
    fn soundtrack_replaces_clip_audio() {
        let comp = concatenate(
            &[
                clip("a.mp4", 4.0, 640, 480, true),
                clip("b.mp4", 2.0, 640, 480, true),
            ],
            CompositingMode::Compose,
        )
        .unwrap();
        let comp = attach_audio(
            comp,
            &AudioHandle {
                path: PathBuf::from("music.mp3"),
                duration: 95.0,
            },
        );

        let graph = build_filter_graph(&comp);
        let args = build_write_args(&comp, Path::new("/tmp/.out.partial.mp4"), ExportCodecs::STANDARD);

        assert!(!graph.contains("[0:a]"));
        assert!(graph.contains("concat=n=2:v=1:a=0[outv]"));
        assert!(graph.ends_with("[2:a]atrim=duration=6,asetpts=PTS-STARTPTS[outa]"));

        assert_eq!(inputs(&args), vec!["a.mp4", "b.mp4", "music.mp3"]);
        assert!(args.contains(&OsString::from("libx264")));
        assert!(args.contains(&OsString::from("aac")));
        assert_eq!(args.last().unwrap(), "/tmp/.out.partial.mp4");
    }

    fn inputs(args: &[OsString]) -> Vec<&OsString> {
        args.iter()
            .zip(args.iter().skip(1))
            .filter(|(flag, _)| flag.as_os_str() == "-i")
            .map(|(_, value)| value)
            .collect()
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_reach_ffmpeg_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let name = std::ffi::OsStr::from_bytes(b"/videos/caf\xE9.mp4");
        let output = std::ffi::OsStr::from_bytes(b"/videos/\xE9t\xE9.mp4");
        let mut handle = clip("placeholder.mp4", 2.0, 640, 480, true);
        handle.path = PathBuf::from(name);

        let comp = concatenate(&[handle], CompositingMode::Compose).unwrap();
        let args = build_write_args(&comp, Path::new(output), ExportCodecs::STANDARD);

        assert_eq!(inputs(&args), vec![name]);
        assert_eq!(args.last().unwrap(), output);
    }

    #[test]
    fn logged_command_line_is_readable() {
        let args = vec![OsString::from("-i"), OsString::from("a.mp4")];
        assert_eq!(command_line("ffmpeg", &args), "ffmpeg -i a.mp4");
    }

    #[test]
    fn number_formatting_trims_zeros() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(29.97002997), "29.97003");
    }
}
