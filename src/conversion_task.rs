use std::fmt::Display;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct ConversionTask {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ConversionTask {
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        ConversionTask { source, destination }
    }
}

impl Display for ConversionTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source.display(), self.destination.display())
    }
}
