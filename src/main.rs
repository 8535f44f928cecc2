pub mod batch;
pub mod config;
pub mod conversion_task;
pub mod converter;
pub mod error;
pub mod ffmpeg;
pub mod filescanner;
pub mod formats;
pub mod fstools;
pub mod resolver;
pub mod transcoder;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use rustop::opts;
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use batch::BatchRunner;
use config::{Options, Settings};
use conversion_task::ConversionTask;
use converter::convert;
use error::Result;
use ffmpeg::FFmpeg;
use resolver::{classify_input, resolve, InputKind};
use transcoder::Transcoder;

const EXIT_SUCCESS: u8 = 0;
const EXIT_CONVERSION_FAILED: u8 = 1;
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    // rustop turns a bool defaulting to true into a --no-<name> flag
    let (args, _rest) = opts! {
        synopsis "Convert audio files to 320kbps MP3 format.";
        opt output:Option<String>, desc:"Output file or directory (default: same as input with .mp3 extension).";
        opt overwrite:bool=false, desc:"Overwrite existing output files.", short:'f';
        opt recursive:bool=true, desc:"Do not process subdirectories (directory mode only).", short:'r';
        opt structure:bool=true, desc:"Do not preserve directory structure (directory mode only).", short:'s';
        opt verbose:bool=false, desc:"Log every step, including the ffmpeg command line.";
        param input:String, desc:"Input audio file or directory.";
    }.parse_or_exit();

    let settings = Settings::from_env();
    init_logging(&settings, args.verbose);

    let options = Options::default()
        .recursive(args.recursive)
        .preserve_structure(args.structure)
        .overwrite(args.overwrite)
        .output(args.output.map(PathBuf::from));

    ExitCode::from(exit_code(run(&PathBuf::from(&args.input), &options, &settings)))
}

fn init_logging(settings: &Settings, verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = settings.log_filter.as_deref()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn stop_flag() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        if let Err(err) = signal_hook::flag::register(signal, Arc::clone(&stop)) {
            warn!("unable to install handler for signal {}: {}", signal, err);
        }
    }
    stop
}

fn run(input: &Path, options: &Options, settings: &Settings) -> Result<u8> {
    let ffmpeg = FFmpeg::locate(settings)?;
    let kind = classify_input(input)?;
    let tasks = resolve(input, options)?;
    let stop = match kind {
        InputKind::File => Arc::new(AtomicBool::new(false)),
        InputKind::Directory => stop_flag(),
    };

    convert_all(kind, tasks, options.overwrite, &ffmpeg, stop)
}

/// Converts the resolved tasks and picks the exit code. A single file's error
/// is returned as is; a batch reports its failures in the summary.
fn convert_all(
    kind: InputKind,
    tasks: Vec<ConversionTask>,
    overwrite: bool,
    transcoder: &dyn Transcoder,
    stop: Arc<AtomicBool>,
) -> Result<u8> {
    match kind {
        InputKind::File => {
            for task in &tasks {
                let outcome = convert(task, overwrite, transcoder)?;
                info!("{}: {}", task, outcome);
            }
            Ok(EXIT_SUCCESS)
        },
        InputKind::Directory => {
            let report = BatchRunner::new(transcoder, overwrite, stop).run(tasks);
            println!("{}", report.summary());

            if report.interrupted() {
                Ok(EXIT_INTERRUPTED)
            } else if report.failed() > 0 {
                Ok(EXIT_CONVERSION_FAILED)
            } else {
                Ok(EXIT_SUCCESS)
            }
        },
    }
}

fn exit_code(result: Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            err.exit_code()
        },
    }
}
