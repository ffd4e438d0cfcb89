//! Single-shot request adapter: one JSON object in, one JSON object out.

use std::io::{Read, Write};

use serde::Serialize;

use crate::{
    engine::AnalysisEngine,
    error::AdapterError,
    messages::{ErrorResult, InferenceRequest, InferenceResult},
    model::Detector,
};

/// Process exit status for a successful analysis.
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status for any reported failure.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputOptions {
    pub pretty: bool,
}

fn write_json<W: Write, T: Serialize>(
    writer: &mut W,
    value: &T,
    options: OutputOptions,
) -> Result<(), AdapterError> {
    if options.pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads the whole input, parses one request and analyzes it.
pub fn analyze_from_reader<D: Detector, R: Read>(
    engine: &AnalysisEngine<D>,
    mut input: R,
) -> Result<InferenceResult, AdapterError> {
    let mut body = String::new();
    input.read_to_string(&mut body)?;
    let request = InferenceRequest::from_json(&body)?;
    Ok(engine.process(request)?.result)
}

/// Writes an error report for `err` and returns the failure status.
pub fn report_error<E: Write>(err: &AdapterError, error_out: &mut E, options: OutputOptions) -> u8 {
    log::error!("Analysis failed ({}): {}", err.kind(), err);
    // nowhere left to report a failure to write the report
    let _ = write_json(error_out, &ErrorResult::from(err), options);
    EXIT_FAILURE
}

/// Runs one request end to end and returns the process exit status.
///
/// On success the result goes to `output`; on any failure nothing is written
/// to `output` and a single error object goes to `error_out`.
pub fn run_once<D, R, W, E>(
    engine: &AnalysisEngine<D>,
    input: R,
    output: &mut W,
    error_out: &mut E,
    options: OutputOptions,
) -> u8
where
    D: Detector,
    R: Read,
    W: Write,
    E: Write,
{
    let outcome = analyze_from_reader(engine, input).and_then(|result| {
        // serialize fully before touching the output so a failure leaves it empty
        let mut buffer = Vec::new();
        write_json(&mut buffer, &result, options)?;
        output.write_all(&buffer)?;
        output.flush()?;
        Ok(())
    });

    match outcome {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => report_error(&err, error_out, options),
    }
}
