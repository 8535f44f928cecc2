use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use human_repr::HumanCount;
use tracing::{error, info, warn};

use crate::conversion_task::ConversionTask;
use crate::converter::{convert, Outcome};
use crate::error::Error;
use crate::transcoder::Transcoder;

pub struct TaskResult {
    pub task: ConversionTask,
    pub result: Result<Outcome, Error>,
}

/// Results of a run, in task order.
pub struct Report {
    pub results: Vec<TaskResult>,
    pub not_started: usize,
    pub interrupted: bool,
}

impl Report {
    pub fn converted(&self) -> usize {
        self.results.iter().filter(|r| matches!(r.result, Ok(Outcome::Converted { .. }))).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| matches!(&r.result, Ok(outcome) if outcome.is_skipped())).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ConversionTask, &Error)> {
        self.results.iter().filter_map(|r| match &r.result {
            Err(err) => Some((&r.task, err)),
            Ok(_) => None,
        })
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn bytes_written(&self) -> u64 {
        self.results.iter().map(|r| match r.result {
            Ok(Outcome::Converted { size }) => size,
            _ => 0,
        }).sum()
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn summary(&self) -> String {
        let rule = "=".repeat(60);
        let mut lines = vec![
            rule.clone(),
            String::from("Conversion Summary:"),
            format!("  Total files: {}", self.results.len() + self.not_started),
            format!("  Converted:   {} ({})", self.converted(), self.bytes_written().human_count_bytes()),
            format!("  Skipped:     {}", self.skipped()),
            format!("  Failed:      {}", self.failed()),
        ];
        if self.interrupted() {
            lines.push(format!("  Not started: {} (interrupted)", self.not_started));
        }
        for (task, _) in self.failures() {
            lines.push(format!("    {}", task.source.display()));
        }
        lines.push(rule);
        lines.join("\n")
    }
}

/// Converts `tasks` one after another. A failed task is recorded and the
/// batch moves on; `stop` is checked before each task.
pub struct BatchRunner<'a> {
    transcoder: &'a dyn Transcoder,
    overwrite: bool,
    stop: Arc<AtomicBool>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(transcoder: &'a dyn Transcoder, overwrite: bool, stop: Arc<AtomicBool>) -> Self {
        BatchRunner { transcoder, overwrite, stop }
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn run(&self, tasks: Vec<ConversionTask>) -> Report {
        let total = tasks.len();
        info!("found {} audio file(s) to convert", total);

        let mut results = Vec::with_capacity(total);
        for (i, task) in tasks.into_iter().enumerate() {
            if self.should_stop() {
                warn!("interrupted; {} file(s) not converted", total - i);
                return Report { results, not_started: total - i, interrupted: true };
            }

            info!("[{}/{}] {}", i + 1, total, task.source.display());
            let result = convert(&task, self.overwrite, self.transcoder);
            match &result {
                Ok(outcome) => info!("  {} -> {}", outcome, task.destination.display()),
                Err(err) => error!("  {}", err),
            }
            results.push(TaskResult { task, result });
        }

        // a signal during the last task still counts
        Report { results, not_started: 0, interrupted: self.should_stop() }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::config::Options;
    use crate::converter::tests::FakeTranscoder;
    use crate::formats::Bitrate;
    use crate::resolver::resolve;

    fn music() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.wav"), b"RIFF").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.flac"), b"fLaC").unwrap();
        fs::write(dir.path().join("sub/c.ogg"), b"OggS").unwrap();
        dir
    }

    fn run(input: &Path, transcoder: &FakeTranscoder) -> Report {
        let tasks = resolve(input, &Options::default()).unwrap();
        BatchRunner::new(transcoder, false, Arc::new(AtomicBool::new(false))).run(tasks)
    }

    #[test]
    fn test_run_converts_every_task() {
        let dir = music();
        let transcoder = FakeTranscoder::new();

        let report = run(dir.path(), &transcoder);
        assert_eq!(report.converted(), 3);
        assert_eq!(report.failed(), 0);
        assert!(!report.interrupted());
        assert_eq!(report.bytes_written(), 33);
        assert!(dir.path().join("sub/b.mp3").exists());
    }

    #[test]
    fn test_second_run_skips_everything() {
        let dir = music();
        run(dir.path(), &FakeTranscoder::new());

        let transcoder = FakeTranscoder::new();
        let report = run(dir.path(), &transcoder);
        assert_eq!(report.results.len(), 3);
        assert!(report.results.iter().all(|r| matches!(r.result, Ok(Outcome::SkippedExisting))));
        assert!(transcoder.calls.borrow().is_empty());
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let dir = music();
        let transcoder = FakeTranscoder::failing_on(&dir.path().join("sub/b.flac"));

        let report = run(dir.path(), &transcoder);
        assert_eq!(report.converted(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(transcoder.calls.borrow().len(), 3);

        let broken = dir.path().join("sub/b.flac");
        let failures: Vec<&Path> = report.failures().map(|(task, _)| task.source.as_path()).collect();
        assert_eq!(failures, vec![broken.as_path()]);
        assert!(report.summary().contains("Failed:      1"));
    }

    /// Fails like ffmpeg does when the interrupt reaches it mid-encode.
    struct InterruptedTranscoder {
        stop: Arc<AtomicBool>,
    }

    impl Transcoder for InterruptedTranscoder {
        fn encode(&self, source: &Path, _destination: &Path, _bitrate: Bitrate) -> crate::error::Result<()> {
            self.stop.store(true, Ordering::Relaxed);
            Err(Error::Transcode {
                path: source.to_path_buf(),
                tool: String::from("ffmpeg"),
                code: Some(255),
                diagnostics: String::from("Exiting normally, received signal 2."),
            })
        }
    }

    #[test]
    fn test_shared_destination_second_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.flac"), b"fLaC").unwrap();
        fs::write(dir.path().join("a.wav"), b"RIFF").unwrap();
        fs::write(dir.path().join("z.ogg"), b"OggS").unwrap();
        let transcoder = FakeTranscoder::new();

        let report = run(dir.path(), &transcoder);
        assert_eq!(report.converted(), 2);
        assert_eq!(report.skipped(), 1);
        assert!(matches!(report.results[1].result, Ok(Outcome::SkippedExisting)));
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_interrupt_during_last_task() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.wav"), b"RIFF").unwrap();
        let tasks = resolve(dir.path(), &Options::default()).unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let transcoder = InterruptedTranscoder { stop: Arc::clone(&stop) };

        let report = BatchRunner::new(&transcoder, false, stop).run(tasks);
        assert_eq!(report.not_started, 0);
        assert_eq!(report.failed(), 1);
        assert!(report.interrupted());
        assert!(report.summary().contains("Not started: 0 (interrupted)"));
    }

    #[test]
    fn test_interrupt_marks_rest_not_started() {
        let dir = music();
        let tasks = resolve(dir.path(), &Options::default()).unwrap();
        let transcoder = FakeTranscoder::new();

        let report = BatchRunner::new(&transcoder, false, Arc::new(AtomicBool::new(true))).run(tasks);
        assert!(report.results.is_empty());
        assert_eq!(report.not_started, 3);
        assert!(report.interrupted());
        assert!(report.summary().contains("Not started: 3 (interrupted)"));
        assert!(transcoder.calls.borrow().is_empty());
    }
}
