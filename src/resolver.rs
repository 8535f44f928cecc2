use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Options;
use crate::conversion_task::ConversionTask;
use crate::error::{Error, Result};
use crate::filescanner::FileScanner;
use crate::formats::{AudioFormat, OUTPUT_EXTENSION};
use crate::fstools::{classify_file, DirEntryCategory};

/// Whether the input was a single file or a directory. Decides how failures
/// are treated by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputKind {
    File,
    Directory,
}

pub fn classify_input(input: &Path) -> Result<InputKind> {
    match classify_file(input) {
        DirEntryCategory::DoesNotExist => Err(Error::not_found(input)),
        DirEntryCategory::RegularFile => Ok(InputKind::File),
        DirEntryCategory::Directory => Ok(InputKind::Directory),
        DirEntryCategory::Unknown => Err(Error::invalid_input(input, "not a regular file or directory")),
    }
}

/// Maps `input` to the ordered list of files to convert.
pub fn resolve(input: &Path, options: &Options) -> Result<Vec<ConversionTask>> {
    match classify_input(input)? {
        InputKind::File => resolve_file(input, options).map(|task| vec![task]),
        InputKind::Directory => resolve_directory(input, options),
    }
}

fn resolve_file(input: &Path, options: &Options) -> Result<ConversionTask> {
    if let Some(format) = AudioFormat::from_path(input) {
        debug!("{:?} is {} audio", input, format);
    } else {
        let msg = match input.extension() {
            Some(ext) => format!("unsupported format .{}", ext.to_string_lossy()),
            None => String::from("unsupported format (no extension)"),
        };
        return Err(Error::invalid_input(input, &msg));
    }

    let destination = match &options.output {
        None => generate_output_filename(input),
        Some(output) if classify_file(output) == DirEntryCategory::Directory => {
            flattened_destination(output, input)
        },
        Some(output) => {
            let is_mp3 = output.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION));
            if !is_mp3 {
                return Err(Error::invalid_input(output, "output file must have an .mp3 extension"));
            }
            output.clone()
        },
    };

    Ok(ConversionTask::new(input.to_path_buf(), destination))
}

fn resolve_directory(input: &Path, options: &Options) -> Result<Vec<ConversionTask>> {
    let root = match &options.output {
        Some(output) => {
            if classify_file(output) == DirEntryCategory::RegularFile {
                return Err(Error::invalid_input(output, "output must be a directory when converting a directory"));
            }
            output.clone()
        },
        None => input.to_path_buf(),
    };

    let mut scanner = FileScanner::new(options.recursive);
    if options.output.is_some() {
        scanner = scanner.exclude(&root);
    }

    let sources = scanner.scan(input);
    if sources.is_empty() {
        return Err(Error::NoAudioFiles { path: input.to_path_buf() });
    }

    let mut tasks: Vec<Option<ConversionTask>> = vec![];
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();

    for source in sources {
        let destination = if options.preserve_structure {
            mirrored_destination(&root, input, &source)
        } else {
            flattened_destination(&root, &source)
        };

        let task = ConversionTask::new(source, destination);
        match claimed.get(&task.destination) {
            None => {
                claimed.insert(task.destination.clone(), tasks.len());
                tasks.push(Some(task));
            },
            Some(&index) => {
                let Some(previous) = tasks[index].take() else {
                    continue;
                };
                if is_self_mapped(&previous) {
                    // an mp3 already sitting at the destination, most likely
                    // the output of an earlier run
                    debug!("{:?} is the output of {:?}", previous.source, task.source);
                    claimed.insert(task.destination.clone(), tasks.len());
                    tasks.push(Some(task));
                } else if is_self_mapped(&task) {
                    debug!("{:?} is the output of {:?}", task.source, previous.source);
                    tasks[index] = Some(previous);
                } else if options.preserve_structure {
                    // both stay; whichever runs second finds the destination
                    // taken and is skipped
                    debug!("{:?} and {:?} share {:?}", previous.source, task.source, task.destination);
                    tasks[index] = Some(previous);
                    tasks.push(Some(task));
                } else {
                    return Err(Error::DestinationCollision {
                        first: previous.source,
                        second: task.source,
                        destination: task.destination,
                    });
                }
            },
        }
    }

    Ok(tasks.into_iter().flatten().collect())
}

fn is_self_mapped(task: &ConversionTask) -> bool {
    task.source == task.destination
}

fn generate_output_filename(path: &Path) -> PathBuf {
    path.with_extension(OUTPUT_EXTENSION)
}

fn flattened_destination(root: &Path, source: &Path) -> PathBuf {
    match source.file_name() {
        Some(file_name) => generate_output_filename(&root.join(file_name)),
        None => generate_output_filename(source),
    }
}

fn mirrored_destination(root: &Path, input: &Path, source: &Path) -> PathBuf {
    match source.strip_prefix(input) {
        Ok(relative) => generate_output_filename(&root.join(relative)),
        Err(_) => flattened_destination(root, source),
    }
}
