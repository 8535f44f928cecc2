use std::path::Path;

use crate::error::Result;
use crate::formats::Bitrate;

/// The external engine that does the actual re-encoding.
pub trait Transcoder {
    /// Encodes `source` to an MP3 at `destination`. Any existing file at
    /// `destination` is replaced.
    fn encode(&self, source: &Path, destination: &Path, bitrate: Bitrate) -> Result<()>;

    /// Reports the bitrate of an existing file, if it can be determined.
    fn bitrate(&self, _path: &Path) -> Option<Bitrate> {
        None
    }
}
