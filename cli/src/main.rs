use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pattern_store_config::resolve_database_path;
use pattern_store_core::{AddedKey, BucketStore, Envelope, Page, PatternError, SetMode, ops};
use pattern_store_sqlite::{DEFAULT_PREFIX, SqliteBucketStore};
use tracing::{Level, debug, warn};
use tracing_subscriber::FmtSubscriber;

/// Operation selected with `--action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum Action {
    /// List buckets, list keys of a bucket, or read one value.
    #[default]
    Get,
    /// Replace the value stored under a key.
    Set,
    /// Store a SQL statement under its fingerprint.
    Add,
    /// Remove a key.
    Delete,
}

#[derive(Debug, Parser)]
#[command(name = "patterncli", version)]
#[command(about = "Inspect and edit the learned SQL pattern store of a database firewall")]
struct Cli {
    /// Pattern store file to open.
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,
    /// Firewall YAML config used to locate the store file (wins over --file).
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
    /// Operation to run.
    #[arg(short = 't', long, value_enum, default_value_t = Action::Get)]
    action: Action,
    /// Bucket to operate on.
    #[arg(short = 'b', long)]
    bucket: Option<String>,
    /// Entry key in 0x-prefixed hex form.
    #[arg(short = 'k', long)]
    key: Option<String>,
    /// SQL statement to store.
    #[arg(short = 'r', long)]
    value: Option<String>,
    /// Index of the first visible entry to list.
    #[arg(short = 's', long, default_value_t = 0, allow_negative_numbers = true)]
    start: i64,
    /// Number of entries to list (-1 lists the rest).
    #[arg(
        short = 'l',
        long,
        default_value_t = Page::DEFAULT_LENGTH,
        allow_negative_numbers = true
    )]
    length: i64,
    /// Table prefix of the store.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,
    /// With `set`, keep the supplied key instead of re-fingerprinting the value.
    #[arg(long)]
    keep_key: bool,
    /// Diagnostic log level, written to stderr.
    #[arg(
        long,
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,
}

/// One store operation with empty arguments already treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Request {
    action: Action,
    bucket: Option<String>,
    key: Option<String>,
    value: Option<String>,
    page: Page,
    set_mode: SetMode,
}

impl From<&Cli> for Request {
    fn from(cli: &Cli) -> Self {
        Self {
            action: cli.action,
            bucket: non_empty(cli.bucket.as_deref()),
            key: non_empty(cli.key.as_deref()),
            value: non_empty(cli.value.as_deref()),
            page: Page::new(cli.start, cli.length),
            set_mode: if cli.keep_key {
                SetMode::KeepKey
            } else {
                SetMode::Fingerprint
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli) {
        Ok(envelope) => print_envelope(&envelope),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_logging(log_level: &str) {
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging disabled: {err}");
    }
}

/// Resolves the store, runs the request, and returns the envelope to print.
///
/// Only a store file that exists but cannot be opened is returned as `Err`.
fn run(cli: &Cli) -> Result<Envelope, String> {
    let file = cli.file.as_deref().filter(|path| !path.as_os_str().is_empty());
    let config = cli.config.as_deref().filter(|path| !path.as_os_str().is_empty());

    let path = match resolve_database_path(file, config) {
        Ok(path) => path,
        Err(err) => {
            warn!(error = %err, path = ?err.path(), "could not locate store file");
            return Ok(Envelope::failure(err));
        }
    };

    let mut store = SqliteBucketStore::open_with_prefix(&path, cli.prefix.as_str())
        .map_err(|e| format!("failed to open store '{}': {e}", path.display()))?;
    debug!(path = %path.display(), prefix = store.prefix(), "opened pattern store");

    Ok(dispatch(&mut store, &Request::from(cli)))
}

/// Runs a request against `store` and wraps the outcome in an envelope.
fn dispatch<S: BucketStore + ?Sized>(store: &mut S, request: &Request) -> Envelope {
    let bucket = request.bucket.as_deref();
    let key = request.key.as_deref();
    let value = request.value.as_deref();
    debug!(action = ?request.action, bucket, key, "dispatching");

    match request.action {
        Action::Add => match (bucket, value) {
            (Some(bucket), Some(value)) => Envelope::from_result(
                ops::add_value(store, bucket, value).map(|key| AddedKey { key }),
            ),
            _ => wrong_arguments("add needs --bucket and --value"),
        },
        Action::Set => match (bucket, key, value) {
            (Some(bucket), Some(key), Some(value)) => Envelope::from_result(
                ops::set_value(store, bucket, key, value, request.set_mode).map(|_| ()),
            ),
            _ => wrong_arguments("set needs --bucket, --key and --value"),
        },
        Action::Delete => match (bucket, key) {
            (Some(bucket), Some(key)) => Envelope::from_result(ops::delete_key(store, bucket, key)),
            _ => wrong_arguments("delete needs --bucket and --key"),
        },
        Action::Get => match (bucket, key) {
            (Some(bucket), Some(key)) => {
                Envelope::from_result(ops::get_value(&*store, bucket, key))
            }
            (Some(bucket), None) => {
                Envelope::from_result(ops::list_keys(&*store, bucket, request.page))
            }
            (None, _) => Envelope::from_result(ops::list_buckets(&*store)),
        },
    }
}

fn wrong_arguments(detail: &str) -> Envelope {
    Envelope::failure(PatternError::WrongArguments(detail.to_string()))
}

fn print_envelope(envelope: &Envelope) {
    match envelope.to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            let fallback = Envelope::failure(format!("failed to encode result: {err}"));
            // A null-data envelope always serializes.
            println!("{}", fallback.to_json().unwrap_or_default());
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_string)
}
