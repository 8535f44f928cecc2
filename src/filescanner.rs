use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::formats::AudioFormat;

pub struct FileScanner {
    pub recursive: bool,
    exclude: Option<PathBuf>,
}

impl FileScanner {
    pub fn new(recursive: bool) -> Self {
        FileScanner { recursive, exclude: None, }
    }

    /// Skips the subtree at `dir` while scanning. Only takes effect if `dir`
    /// already exists.
    pub fn exclude(mut self, dir: &Path) -> Self {
        self.exclude = fs::canonicalize(dir).ok();
        self
    }

    /// Lists audio files under `dirpath`, sorted by file name within each
    /// directory.
    pub fn scan(&self, dirpath: &Path) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(dirpath).sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut files = vec![];
        for entry in walker.into_iter().filter_entry(|e| !self.is_excluded(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry: {}", err);
                    continue;
                },
            };

            let ft = entry.file_type();
            if ft.is_symlink() {
                debug!("{:?} is a symlink; ignoring", entry.path());
            } else if ft.is_file() {
                match AudioFormat::from_path(entry.path()) {
                    Some(format) => {
                        debug!("found {} file {:?}", format, entry.path());
                        files.push(entry.into_path());
                    },
                    None => debug!("{:?} is not a recognised audio file", entry.path()),
                }
            }
        }

        files
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        match &self.exclude {
            Some(exclude) if entry.depth() > 0 && entry.file_type().is_dir() => {
                match fs::canonicalize(entry.path()) {
                    Ok(path) => {
                        if path == *exclude {
                            debug!("not scanning output directory {:?}", entry.path());
                            true
                        } else {
                            false
                        }
                    },
                    Err(_) => false,
                }
            },
            _ => false,
        }
    }
}
