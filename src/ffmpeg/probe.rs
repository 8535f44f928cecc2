use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json;

use crate::error::{Error, Result};
use crate::formats::Bitrate;

#[derive(Serialize, Deserialize, Debug)]
struct FFProbeJsonOutput {
    pub format: Option<FFProbeJsonFormat>,
}

#[derive(Serialize, Deserialize, Debug)]
struct FFProbeJsonFormat {
    pub bit_rate: Option<String>,
}

/// Reads the overall bitrate of `path` with ffprobe.
pub fn probe_bitrate(ffprobe: &Path, path: &Path) -> Result<Bitrate> {
    let output = Command::new(ffprobe)
        .args(["-v", "error", "-of", "json", "-show_entries", "format=bit_rate"])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|err| Error::probe(path, &format!("unable to run {}: {}", ffprobe.display(), err)))?;

    if output.status.success() {
        parse_bitrate(path, &String::from_utf8_lossy(&output.stdout))
    } else {
        Err(Error::probe(path, "ffprobe did not exit successfully."))
    }
}

fn parse_bitrate(path: &Path, json: &str) -> Result<Bitrate> {
    let deserialized = serde_json::from_str::<FFProbeJsonOutput>(json)
        .map_err(|err| Error::probe(path, &err.to_string()))?;
    let bit_rate = deserialized.format
        .and_then(|format| format.bit_rate)
        .ok_or_else(|| Error::probe(path, "no bit_rate in ffprobe output"))?;
    match bit_rate.trim().parse::<u64>() {
        Ok(bps) => Ok(Bitrate::from_bps(bps)),
        Err(_) => Err(Error::probe(path, &format!("bit_rate '{}' is not a number", bit_rate))),
    }
}
