use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::formats::Bitrate;
use crate::transcoder::Transcoder;

pub mod probe;

pub struct FFmpeg {
    program: PathBuf,
    probe_program: Option<PathBuf>,
}

impl FFmpeg {
    pub fn new(program: PathBuf, probe_program: Option<PathBuf>) -> Self {
        FFmpeg { program, probe_program }
    }

    /// Finds ffmpeg and ffprobe, preferring the locations given in
    /// `settings`. Fails only if ffmpeg itself is missing.
    pub fn locate(settings: &Settings) -> Result<Self> {
        let program = find_tool("ffmpeg", settings.ffmpeg.as_deref())
            .ok_or_else(|| Error::ToolNotFound { tool: String::from("ffmpeg") })?;
        let probe_program = find_tool("ffprobe", settings.ffprobe.as_deref());
        if probe_program.is_none() {
            debug!("ffprobe not found; existing mp3 files will not be probed");
        }

        debug!("using {:?}", program);
        Ok(FFmpeg::new(program, probe_program))
    }

    fn build_args(source: &Path, destination: &Path, bitrate: Bitrate) -> Vec<OsString> {
        fn oss(s: &str) -> OsString { OsString::from(s) }

        vec![
            oss("-hide_banner"),
            oss("-nostdin"),
            oss("-loglevel"), oss("error"),
            oss("-i"), source.as_os_str().to_os_string(),
            // audio only; drops embedded cover art streams
            oss("-vn"),
            oss("-map"), oss("a"),
            oss("-c:a"), oss("libmp3lame"),
            oss("-b:a"), oss(&bitrate.to_string()),
            oss("-ar"), oss("44100"),
            oss("-ac"), oss("2"),
            oss("-map_metadata"), oss("0"),
            oss("-id3v2_version"), oss("3"),
            // existence of the destination was already checked by the caller
            oss("-y"),
            destination.as_os_str().to_os_string(),
        ]
    }
}

impl Transcoder for FFmpeg {
    fn encode(&self, source: &Path, destination: &Path, bitrate: Bitrate) -> Result<()> {
        let existed = destination.exists();
        let args = FFmpeg::build_args(source, destination, bitrate);
        debug!("{} {}", self.program.display(), args.iter().map(|s| format!("{:?}", s)).collect::<Vec<String>>().join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| Error::Transcode {
                path: source.to_path_buf(),
                tool: String::from("ffmpeg"),
                code: None,
                diagnostics: format!("unable to run {}: {}", self.program.display(), err),
            })?;

        if output.status.success() {
            return Ok(());
        }

        if !existed && destination.exists() {
            match fs::remove_file(destination) {
                Ok(()) => debug!("removed partial output {:?}", destination),
                Err(err) => warn!("unable to remove partial output {:?}: {}", destination, err),
            }
        }

        Err(Error::Transcode {
            path: source.to_path_buf(),
            tool: String::from("ffmpeg"),
            code: output.status.code(),
            diagnostics: diagnostics(&output.stderr, &output.stdout),
        })
    }

    fn bitrate(&self, path: &Path) -> Option<Bitrate> {
        let ffprobe = self.probe_program.as_ref()?;
        match probe::probe_bitrate(ffprobe, path) {
            Ok(bitrate) => Some(bitrate),
            Err(err) => {
                debug!("{}", err);
                None
            },
        }
    }
}

fn find_tool(name: &str, configured: Option<&Path>) -> Option<PathBuf> {
    match configured {
        Some(path) => match which::which(path) {
            Ok(found) => Some(found),
            Err(err) => {
                warn!("configured {} {:?} is not usable: {}", name, path, err);
                None
            },
        },
        None => which::which(name).ok(),
    }
}

fn diagnostics(stderr: &[u8], stdout: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    if stderr.trim().is_empty() {
        String::from_utf8_lossy(stdout).trim_end().to_string()
    } else {
        stderr.trim_end().to_string()
    }
}
