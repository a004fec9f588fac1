//! Tawfiq: entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger once
//!   5. Load both corpora (fatal on any failure)
//!   6. Build the agent, query log and supervisor bus
//!   7. Spawn Ctrl-C → shutdown signal watcher
//!   8. Spawn supervisor run-loop
//!   9. Run comms channels until they exit
//!  10. Cancel token + join supervisor

use tokio_util::sync::CancellationToken;
use tracing::info;

use tawfiq::config;
use tawfiq::corpus::Corpus;
use tawfiq::error::AppError;
use tawfiq::logger;
use tawfiq::subsystems::agents::Tawfiq;
use tawfiq::subsystems::comms;
use tawfiq::subsystems::memory::QueryLog;
use tawfiq::supervisor::Supervisor;
use tawfiq::supervisor::bus::SupervisorBus;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Optional file; a missing .env is fine.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let mut config = config::load(args.config_path.as_deref())?;

    // Without -i the console stays off (daemon-safe default).
    if !args.interactive {
        config.comms.pty.enabled = false;
    }

    if !config.comms_pty_should_load() && !config.comms_http_should_load() {
        return Err(AppError::Config(
            "no comms channel enabled: run with -i or set [comms.http] enabled = true".into(),
        ));
    }

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    let force_cli_level = args.log_level.is_some();

    logger::init(effective_log_level, force_cli_level)?;

    info!(
        bot_name = %config.bot_name,
        work_dir = %config.work_dir.display(),
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        interactive = %args.interactive,
        "config loaded"
    );

    let corpus = Corpus::load(&config.corpus.hadiths, &config.corpus.friendly_responses)?;
    let query_log = QueryLog::open(&config.query_log)?;
    let supervisor = Supervisor::new(Tawfiq::new(corpus), query_log);

    let bus = SupervisorBus::new(64);
    let bus_handle = bus.handle.clone();

    // Shared shutdown token. Ctrl-C cancels it and every task watches it.
    let shutdown = CancellationToken::new();

    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let supervisor_task = tokio::spawn(supervisor.run(bus, shutdown.clone()));

    let comms = comms::start(&config, bus_handle, shutdown.clone());
    let result = comms.join().await;

    shutdown.cancel();
    let _ = supervisor_task.await;

    info!("tawfiq stopped");
    result
}

struct CliArgs {
    log_level: Option<&'static str>,
    interactive: bool,
    config_path: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut interactive = false;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: tawfiq [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -i, --interactive          Run in interactive mode (enables the console)");
                println!("  -f, --config <PATH>        Path to configuration file (default: {})", config::DEFAULT_CONFIG_PATH);
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-i" | "--interactive" => interactive = true,
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    //   -v      → warn
    //   -vv     → info
    //   -vvv    → debug
    //   -vvvv+  → trace
    let log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };

    CliArgs { log_level, interactive, config_path }
}
