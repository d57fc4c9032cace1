use crate::api;
use crate::error::FetchError;
use crate::tools::batch::BatchOptions;
use crate::tools::fetch::{
    FetchConfig, FetchRequest, FetchResult, Orchestrator, StrategyKind, DEFAULT_TIMEOUT_MS,
    MAX_BODY_BYTES,
};
use crate::ApiResponse;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "srcfetch",
    version,
    about = "Fetch page source with fallback strategies (JSON output)"
)]
pub struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one URL through the strategy ladder
    Fetch(FetchArgs),
    /// Fetch several URLs with bounded concurrency
    Batch(BatchArgs),
    /// Show the strategies the current flags would run, in order
    Strategies(LadderArgs),
    /// Show recent fetch activity
    Logs(LogsArgs),
}

#[derive(Args)]
struct FetchArgs {
    /// URL to fetch
    url: String,
    /// Run a single strategy instead of the ladder
    #[arg(long)]
    strategy: Option<StrategyKind>,
    /// Per-strategy budget in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
    /// Reject bodies larger than this many bytes
    #[arg(long, default_value_t = MAX_BODY_BYTES)]
    max_bytes: u64,
    #[command(flatten)]
    ladder: LadderArgs,
    /// Print raw source to stdout instead of the JSON envelope
    #[arg(long)]
    raw: bool,
}

#[derive(Args)]
struct LadderArgs {
    /// Include the rung that skips TLS certificate validation
    #[arg(long)]
    insecure: bool,
    /// Skip the headless-browser rung
    #[arg(long)]
    no_render: bool,
}

#[derive(Args)]
struct BatchArgs {
    /// URLs to fetch (up to 5)
    urls: Vec<String>,
    /// Fetches in flight at once
    #[arg(long, default_value_t = 2)]
    concurrency: usize,
    #[command(flatten)]
    ladder: LadderArgs,
}

#[derive(Args)]
struct LogsArgs {
    /// Only error entries
    #[arg(long)]
    errors: bool,
    /// Only entries mentioning this host
    #[arg(long)]
    host: Option<String>,
}

pub fn run() {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Fetch(args) => fetch_cmd(args),
        Command::Batch(args) => batch_cmd(args),
        Command::Strategies(ladder) => {
            let config = config_from(MAX_BODY_BYTES, &ladder);
            finish(
                Orchestrator::new(&config)
                    .map(|o| o.kinds().iter().map(|k| k.name()).collect::<Vec<_>>()),
            );
        }
        Command::Logs(args) => {
            finish(
                crate::log::ActivityLogger::new()
                    .and_then(|logger| logger.read_logs(args.host.as_deref(), args.errors)),
            );
        }
    }
}

fn config_from(max_bytes: u64, ladder: &LadderArgs) -> FetchConfig {
    FetchConfig {
        max_body_bytes: max_bytes,
        allow_insecure: ladder.insecure,
        render: !ladder.no_render,
        ..FetchConfig::default()
    }
}

fn fetch_cmd(args: FetchArgs) {
    let config = config_from(args.max_bytes, &args.ladder);

    let mut request = match FetchRequest::new(&args.url) {
        Ok(r) => r.with_timeout(Duration::from_millis(args.timeout_ms)),
        Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
    };
    if let Some(kind) = args.strategy {
        request = request.with_strategy(kind);
    }

    eprintln!("Fetching {}...", args.url);
    let result = crate::runtime::block_on(api::fetch_request(&request, &config));
    finish_fetch(result, args.raw);
}

fn batch_cmd(args: BatchArgs) {
    let config = config_from(MAX_BODY_BYTES, &args.ladder);
    let options = BatchOptions {
        concurrency: args.concurrency,
        ..BatchOptions::default()
    };

    let result = crate::runtime::block_on(api::fetch_batch(args.urls, &options, &config));
    match result {
        Ok(outcomes) => {
            let rows: Vec<serde_json::Value> = outcomes
                .into_iter()
                .map(|(url, outcome)| match outcome {
                    Ok(r) => serde_json::json!({ "url": url, "ok": true, "data": r }),
                    Err(e) => {
                        serde_json::json!({ "url": url, "ok": false, "error": e.to_string() })
                    }
                })
                .collect();
            print_json(ApiResponse::ok(rows));
        }
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}

fn finish_fetch(result: crate::Result<FetchResult>, raw: bool) {
    match result {
        Ok(r) if raw => {
            println!("{}", r.content);
            eprintln!("✓ {} bytes via {} in {}ms", r.bytes, r.strategy, r.duration_ms);
        }
        Ok(r) => print_json(ApiResponse::ok(r)),
        Err(FetchError::Exhausted { failures }) => {
            // Keep the per-rung breakdown visible in the envelope
            let error = format!("no retrieval strategy succeeded ({} tried)", failures.len());
            print_json(ApiResponse {
                ok: false,
                data: Some(serde_json::json!({ "attempts": failures })),
                error: Some(error),
            });
        }
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}

fn finish<T: serde::Serialize>(res: crate::Result<T>) {
    match res {
        Ok(v) => print_json(ApiResponse::ok(v)),
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}
fn print_json<T: serde::Serialize>(val: T) {
    // pretty JSON output
    println!("{}", serde_json::to_string_pretty(&val).unwrap());
}
