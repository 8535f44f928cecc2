use std::fmt::Display;
use std::fs;

use human_repr::HumanCount;
use tracing::debug;

use crate::conversion_task::ConversionTask;
use crate::error::{Error, Result};
use crate::formats::{AudioFormat, Bitrate};
use crate::fstools::{file_size, same_file};
use crate::transcoder::Transcoder;

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Converted { size: u64 },
    SkippedExisting,
    SkippedAlreadyEncoded { bitrate: Bitrate },
}

impl Outcome {
    pub fn is_skipped(&self) -> bool {
        !matches!(self, Outcome::Converted { .. })
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Converted { size } => write!(f, "converted ({})", size.human_count_bytes()),
            Outcome::SkippedExisting => write!(f, "skipped (file exists)"),
            Outcome::SkippedAlreadyEncoded { bitrate } => write!(f, "skipped (already {}bps)", bitrate),
        }
    }
}

/// Converts one task. An existing destination is left alone unless
/// `overwrite` is set.
pub fn convert(task: &ConversionTask, overwrite: bool, transcoder: &dyn Transcoder) -> Result<Outcome> {
    if task.destination.exists() {
        if !overwrite {
            return Ok(skip_reason(task, transcoder));
        }
        if same_file(&task.source, &task.destination) {
            return Err(Error::invalid_input(&task.source, "source and destination are the same file"));
        }
        debug!("overwriting {:?}", task.destination);
    }

    if let Some(parent) = task.destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| Error::filesystem(parent, err))?;
        }
    }

    transcoder.encode(&task.source, &task.destination, Bitrate::TARGET)?;

    Ok(Outcome::Converted { size: file_size(&task.destination) })
}

fn skip_reason(task: &ConversionTask, transcoder: &dyn Transcoder) -> Outcome {
    if AudioFormat::from_path(&task.source) == Some(AudioFormat::MP3) {
        if let Some(bitrate) = transcoder.bitrate(&task.source) {
            if bitrate >= Bitrate::TARGET {
                return Outcome::SkippedAlreadyEncoded { bitrate };
            }
        }
    }

    Outcome::SkippedExisting
}
