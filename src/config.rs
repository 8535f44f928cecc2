use std::env;
use std::path::PathBuf;

/// How the input is mapped to output files. Built once from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub recursive: bool,
    pub preserve_structure: bool,
    pub overwrite: bool,
    pub output: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            recursive: true,
            preserve_structure: true,
            overwrite: false,
            output: None,
        }
    }
}

impl Options {
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn preserve_structure(mut self, preserve_structure: bool) -> Self {
        self.preserve_structure = preserve_structure;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }
}

pub const FFMPEG_ENV: &str = "AUDIO2MP3_FFMPEG";
pub const FFPROBE_ENV: &str = "AUDIO2MP3_FFPROBE";
pub const LOG_ENV: &str = "AUDIO2MP3_LOG";

/// Settings taken from the environment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key| lookup(key).filter(|v: &String| !v.trim().is_empty());
        Settings {
            ffmpeg: non_empty(FFMPEG_ENV).map(PathBuf::from),
            ffprobe: non_empty(FFPROBE_ENV).map(PathBuf::from),
            log_filter: non_empty(LOG_ENV),
        }
    }
}
