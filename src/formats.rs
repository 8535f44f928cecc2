use std::fmt::Display;
use std::path::Path;

/// Input formats recognised by file extension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioFormat {
    MP3,
    WAV,
    FLAC,
    M4A,
    AAC,
    OGG,
    Opus,
    WMA,
    AIFF,
    APE,
    AC3,
    MP2,
}

pub const OUTPUT_EXTENSION: &str = "mp3";

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::MP3),
            "wav" => Some(AudioFormat::WAV),
            "flac" => Some(AudioFormat::FLAC),
            "m4a" => Some(AudioFormat::M4A),
            "aac" => Some(AudioFormat::AAC),
            "ogg" => Some(AudioFormat::OGG),
            "opus" => Some(AudioFormat::Opus),
            "wma" => Some(AudioFormat::WMA),
            "aiff" => Some(AudioFormat::AIFF),
            "ape" => Some(AudioFormat::APE),
            "ac3" => Some(AudioFormat::AC3),
            "mp2" => Some(AudioFormat::MP2),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(AudioFormat::from_extension)
    }

    pub fn extension(format: AudioFormat) -> &'static str {
        match format {
            AudioFormat::MP3 => "mp3",
            AudioFormat::WAV => "wav",
            AudioFormat::FLAC => "flac",
            AudioFormat::M4A => "m4a",
            AudioFormat::AAC => "aac",
            AudioFormat::OGG => "ogg",
            AudioFormat::Opus => "opus",
            AudioFormat::WMA => "wma",
            AudioFormat::AIFF => "aiff",
            AudioFormat::APE => "ape",
            AudioFormat::AC3 => "ac3",
            AudioFormat::MP2 => "mp2",
        }
    }
}

impl Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", AudioFormat::extension(*self))
    }
}

/// Bitrate in kbps.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Bitrate(pub u32);

impl Bitrate {
    pub const TARGET: Bitrate = Bitrate(320);

    pub fn from_bps(bps: u64) -> Self {
        Bitrate((bps / 1000) as u32)
    }
}

impl Display for Bitrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}k", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(AudioFormat::from_path(Path::new("/music/a.flac")), Some(AudioFormat::FLAC));
        assert_eq!(AudioFormat::from_path(Path::new("B.WAV")), Some(AudioFormat::WAV));
        assert_eq!(AudioFormat::from_path(Path::new("track.Opus")), Some(AudioFormat::Opus));
        assert_eq!(AudioFormat::from_path(Path::new("cover.jpg")), None);
        assert_eq!(AudioFormat::from_path(Path::new("flac")), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", AudioFormat::AIFF), "aiff");
        assert_eq!(format!("{}", Bitrate::TARGET), "320k");
    }

    #[test]
    fn test_bitrate_from_bps() {
        assert_eq!(Bitrate::from_bps(320_000), Bitrate(320));
        assert_eq!(Bitrate::from_bps(319_999), Bitrate(319));
        assert!(Bitrate::from_bps(320_500) >= Bitrate::TARGET);
    }
}
