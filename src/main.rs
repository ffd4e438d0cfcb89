use std::{io, path::PathBuf, process::ExitCode};

use argh::FromArgs;
use env_logger::Env;
use terrascan_infer::{
    AnalysisEngine, Detector, FixtureDetector, MockDetector, OutputOptions, report_error,
    run_once,
};

#[derive(FromArgs)]
/// Reads one analysis request as JSON from stdin and writes the detection
/// report to stdout, or an error report to stderr.
struct TerrascanArgs {
    /// serve detections from this JSON fixture instead of the built-in mock
    #[argh(option, short = 'f')]
    fixture: Option<PathBuf>,

    /// pretty-print the JSON output
    #[argh(switch)]
    pretty: bool,
}

fn run<D: Detector>(detector: D, options: OutputOptions) -> u8 {
    let engine = AnalysisEngine::new(detector);
    run_once(
        &engine,
        io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
        options,
    )
}

fn main() -> ExitCode {
    // stderr carries the error report, so logs stay off unless RUST_LOG asks for them
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
    let args: TerrascanArgs = argh::from_env();
    let options = OutputOptions {
        pretty: args.pretty,
    };

    let code = match args.fixture {
        Some(path) => match FixtureDetector::load(&path) {
            Ok(detector) => run(detector, options),
            Err(err) => report_error(&err, &mut io::stderr().lock(), options),
        },
        None => run(MockDetector, options),
    };
    ExitCode::from(code)
}
