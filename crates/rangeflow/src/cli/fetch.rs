use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Args;
use rangeflow_loader::{
    ByteRange, DataSource, ErrorDetail, ErrorHandling, ErrorKind, LoaderConfig, LoaderHandle,
    LoaderObserver, Outcome, ParamSeekHandler, Progress, RangeSeekHandler, ReferrerPolicy,
    ReqwestClient, SeekHandler, StreamingLoader,
};
use tracing::{debug, error, info, warn};

#[derive(Args, Clone, Debug)]
pub struct FetchArg {
    #[arg(help = "Resource URL")]
    pub url: String,

    #[arg(long, default_value_t = 0, help = "First byte to request")]
    pub from: u64,

    #[arg(long, help = "Last byte to request, inclusive; open-ended if omitted")]
    pub to: Option<u64>,

    #[arg(short = 'H', long = "header", value_parser = parse_header, help = "Extra request header, \"Name: value\"")]
    pub headers: Vec<(String, String)>,

    #[arg(long, help = "Send the range as query parameters instead of a Range header")]
    pub param_seek: bool,

    #[arg(long, default_value = "bstart", requires = "param_seek")]
    pub start_param: String,

    #[arg(long, default_value = "bend", requires = "param_seek")]
    pub end_param: String,

    #[arg(long, help = "Loader configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Reject responses from another origin")]
    pub no_cors: bool,

    #[arg(long, help = "Keep credentials embedded in the URL")]
    pub with_credentials: bool,

    #[arg(long)]
    pub referrer_policy: Option<ReferrerPolicy>,

    #[arg(short, long, help = "Output file; stdout if omitted")]
    pub output: Option<PathBuf>,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {s:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_config(text: &str) -> Result<LoaderConfig> { toml::from_str(text).context("invalid loader configuration") }

fn load_config(path: Option<&Path>) -> Result<LoaderConfig> {
    let Some(path) = path else {
        return Ok(LoaderConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&text).with_context(|| format!("in {}", path.display()))
}

/// Writes the body out as it arrives.
///
/// A failed write aborts the loader; the error is surfaced after `open` returns.
struct Sink<W: Write> {
    out:         W,
    handle:      LoaderHandle,
    expected:    Option<u64>,
    write_error: Option<io::Error>,
}

impl<W: Write> LoaderObserver for Sink<W> {
    fn on_url_redirect(&mut self, url: &str) { info!(%url, "redirected"); }

    fn on_content_length_known(&mut self, length: u64) {
        self.expected = Some(length);
        info!(length, "content length");
    }

    fn on_data_arrival(&mut self, chunk: &Bytes, byte_start: u64, received_length: u64) {
        if self.write_error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(chunk) {
            self.write_error = Some(e);
            self.handle.abort();
            return;
        }
        let progress = Progress {
            expected_length: self.expected,
            received_length,
        };
        match progress.percentage() {
            Some(percent) => debug!(byte_start, received_length, percent = format_args!("{percent:.1}"), "chunk written"),
            None => debug!(byte_start, received_length, "chunk written"),
        }
    }

    fn on_complete(&mut self, first_byte: u64, last_byte: Option<u64>) {
        match last_byte {
            Some(last) => info!(first_byte, last_byte = last, "transfer complete"),
            None => info!(first_byte, "transfer complete, no data"),
        }
    }

    fn on_error(&mut self, kind: ErrorKind, detail: &ErrorDetail) -> ErrorHandling {
        error!(%kind, code = detail.code, message = %detail.message, "transfer failed");
        ErrorHandling::Handled
    }
}

pub async fn run(arg: FetchArg) -> Result<ExitCode> {
    let mut config = load_config(arg.config.as_deref())?;
    for (name, value) in arg.headers {
        config = config.header(name, value);
    }

    let mut source = DataSource::new(&arg.url)
        .cors(!arg.no_cors)
        .with_credentials(arg.with_credentials);
    if let Some(policy) = arg.referrer_policy {
        source = source.referrer_policy(policy);
    }

    let seek: Box<dyn SeekHandler> = if arg.param_seek {
        Box::new(ParamSeekHandler::new(arg.start_param, arg.end_param))
    } else {
        Box::new(RangeSeekHandler::default())
    };

    let client = ReqwestClient::new().context("failed to build HTTP client")?;
    let mut loader = StreamingLoader::new(client, seek, config);

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupt = loader.handle();
    let flag = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, aborting transfer");
            flag.store(true, Ordering::SeqCst);
            interrupt.abort();
        }
    });

    let out: Box<dyn Write> = match &arg.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut sink = Sink {
        out,
        handle: loader.handle(),
        expected: None,
        write_error: None,
    };

    let range = ByteRange::new(arg.from, arg.to);
    if let Some(bytes) = range.byte_count() {
        info!(range = %range, bytes, "requesting range");
    }
    let outcome = loader.open(&source, range, &mut sink).await?;

    if let Some(e) = sink.write_error {
        return Err(e).context("failed to write output");
    }
    sink.out.flush().context("failed to flush output")?;

    Ok(exit_code(&outcome, interrupted.load(Ordering::SeqCst)))
}

/// An interrupt ends the transfer as a clean completion, but the output is
/// truncated, so it still exits like a signal.
fn exit_code(outcome: &Outcome, interrupted: bool) -> ExitCode {
    match outcome {
        Outcome::Completed { .. } if interrupted => {
            warn!("transfer stopped by interrupt, output is truncated");
            ExitCode::from(130)
        }
        Outcome::Completed { .. } => ExitCode::SUCCESS,
        Outcome::Aborted => {
            warn!("aborted before the response arrived");
            ExitCode::from(130)
        }
        Outcome::Failed { .. } => ExitCode::FAILURE,
    }
}
