use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("{}: {msg}", path.display())]
    InvalidInput { path: PathBuf, msg: String },

    #[error("no audio files found in {}", path.display())]
    NoAudioFiles { path: PathBuf },

    #[error("{} and {} would both be written to {}", first.display(), second.display(), destination.display())]
    DestinationCollision {
        first: PathBuf,
        second: PathBuf,
        destination: PathBuf,
    },

    #[error("error converting {}: {tool} {}\n{diagnostics}", path.display(), exit_status(*code))]
    Transcode {
        path: PathBuf,
        tool: String,
        code: Option<i32>,
        diagnostics: String,
    },

    #[error("{}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{tool} not found. Please install {tool}:\n  Ubuntu/Debian: sudo apt-get install ffmpeg\n  macOS: brew install ffmpeg\n  Windows: download from https://ffmpeg.org/download.html")]
    ToolNotFound { tool: String },

    #[error("unable to probe {}: {msg}", path.display())]
    Probe { path: PathBuf, msg: String },
}

impl Error {
    pub fn not_found(path: &Path) -> Self {
        Error::NotFound { path: path.to_path_buf() }
    }

    pub fn invalid_input(path: &Path, msg: &str) -> Self {
        Error::InvalidInput {
            path: path.to_path_buf(),
            msg: String::from(msg),
        }
    }

    pub fn filesystem(path: &Path, source: io::Error) -> Self {
        Error::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn probe(path: &Path, msg: &str) -> Self {
        Error::Probe {
            path: path.to_path_buf(),
            msg: String::from(msg),
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::NotFound { .. }
            | Error::InvalidInput { .. }
            | Error::NoAudioFiles { .. }
            | Error::DestinationCollision { .. } => 2,
            Error::ToolNotFound { .. } => 3,
            Error::Transcode { .. } | Error::Filesystem { .. } | Error::Probe { .. } => 1,
        }
    }
}

fn exit_status(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with {}", code),
        None => String::from("did not exit successfully"),
    }
}
