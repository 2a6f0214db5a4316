//! qbxml-tool - format QBXML query requests and inspect saved responses.
//!
//! # Usage
//!
//! ```text
//! qbxml-tool format <kind> [filter.json]
//! qbxml-tool parse <kind> <response.xml>
//! ```
//!
//! `<kind>` is `check`, `item`, `purchase_order` or `generic:<Base>`
//! (e.g. `generic:InvoiceQuery`). `format` prints the request document built
//! from an optional JSON filter; `parse` prints the normalized records of a
//! saved response as JSON. Logs go to stderr.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QBXML_VERSION` | `13.0` | Declared protocol version |
//! | `QBXML_ON_ERROR` | `stopOnError` | Request `onError` mode |
//! | `QBXML_DEFAULT_LOOKBACK_DAYS` | `30` | Lookback without dates |
//! | `QBXML_DUMP_DIR` | *(unset)* | Also write formatted requests here |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use qbxml_core::{
    DumpPart, DumpStem, DumpTarget, FilterBuilder, QbxmlConfig, RequestKind, format_request,
};
use qbxml_model::{FilterSpec, NormalizedRecord};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: qbxml-tool format <kind> [filter.json]\n       qbxml-tool parse <kind> <response.xml>";

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// A parsed command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Format {
        kind: RequestKind,
        filter: Option<PathBuf>,
    },
    Parse {
        kind: RequestKind,
        response: PathBuf,
    },
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let Some(action) = args.next() else {
        bail!("missing command\n{USAGE}");
    };
    let Some(kind) = args.next() else {
        bail!("missing request kind\n{USAGE}");
    };
    let kind: RequestKind = kind.parse()?;
    let path = args.next().map(PathBuf::from);
    if let Some(extra) = args.next() {
        bail!("unexpected argument {extra:?}\n{USAGE}");
    }

    match (action.as_str(), path) {
        ("format", filter) => Ok(Command::Format { kind, filter }),
        ("parse", Some(response)) => Ok(Command::Parse { kind, response }),
        ("parse", None) => bail!("missing response file\n{USAGE}"),
        (other, _) => bail!("unknown command {other:?}\n{USAGE}"),
    }
}

fn read_filter(path: Option<&Path>) -> Result<FilterSpec> {
    let Some(path) = path else {
        return Ok(FilterSpec::default());
    };
    let raw =
        std::fs::read(path).with_context(|| format!("cannot read filter {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("invalid filter {}", path.display()))
}

fn format_command(config: &QbxmlConfig, kind: &RequestKind, filter: Option<&Path>) -> Result<Vec<u8>> {
    let spec = read_filter(filter)?;
    let strategy = kind.strategy(config)?;
    let body = FilterBuilder::new(config).build(strategy.as_ref(), spec);
    let request = format_request(config, strategy.request_type(), &body)
        .with_context(|| format!("cannot format {kind} request"))?;

    if let Some(dir) = &config.dump_dir {
        let stem = DumpStem::new(strategy.request_type());
        if let Some(path) = DumpTarget::new(dir).write(&stem, DumpPart::Request, &request) {
            info!(path = %path.display(), "saved request");
        }
    }
    Ok(request.to_vec())
}

fn parse_command(config: &QbxmlConfig, kind: &RequestKind, response: &Path) -> Result<Vec<NormalizedRecord>> {
    let raw = std::fs::read(response)
        .with_context(|| format!("cannot read response {}", response.display()))?;
    let envelope = qbxml_xml::decode(&raw)
        .with_context(|| format!("cannot decode response {}", response.display()))?;
    if let Some(failure) = envelope.business_error() {
        error!(%failure, "response carries a business error");
    }

    let strategy = kind.strategy(config)?;
    let records: Vec<_> = strategy.normalize(&envelope)?.collect();
    debug!(records = records.len(), "normalized response");
    Ok(records)
}

fn main() -> Result<()> {
    let config = QbxmlConfig::from_env();
    init_tracing(&config.log_level)?;

    let command = parse_args(std::env::args().skip(1))?;
    let mut stdout = std::io::stdout().lock();
    match command {
        Command::Format { kind, filter } => {
            let request = format_command(&config, &kind, filter.as_deref())?;
            stdout.write_all(&request)?;
        }
        Command::Parse { kind, response } => {
            let records = parse_command(&config, &kind, &response)?;
            serde_json::to_writer_pretty(&mut stdout, &records)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
