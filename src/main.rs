//! YVI bot entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger once
//!   5. Load seed entries, build the knowledge store, probe it
//!   6. Build the fallback snapshot (if enabled)
//!   7. Spawn Ctrl-C → shutdown signal watcher
//!   8. Run the HTTP channel until shutdown

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use yvi_bot::bootstrap::logger;
use yvi_bot::knowledge::snapshot::KnowledgeSnapshot;
use yvi_bot::knowledge::stores::{self, local::LocalStore};
use yvi_bot::knowledge::{KnowledgeStore, StoreError, seed};
use yvi_bot::subsystems::chat::ChatService;
use yvi_bot::subsystems::{comms, ui};
use yvi_bot::{config, error};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some(), config.log_file.as_deref())?;

    info!(
        bot_name = %config.bot_name,
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        store = %config.store.backend,
        ui_mode = %config.ui.mode,
        "config loaded"
    );
    if let Some(value) = config.ignored_env_mode.as_deref() {
        warn!(%value, "unrecognized YVI_ENV, serving the production UI");
    }

    let seed_entries = seed::load_optional(config.knowledge.seed_file.as_deref())?;

    let store = match stores::build(&config.store, config.store_api_key.clone(), seed_entries.clone()) {
        Ok(store) => store,
        Err(StoreError::NotConfigured(reason)) => {
            warn!(%reason, seed_entries = seed_entries.len(), "store not configured, serving seed entries from the local store");
            KnowledgeStore::Local(LocalStore::new(seed_entries.clone()))
        }
        Err(e) => return Err(error::AppError::Store(e.to_string())),
    };

    match store.ping().await {
        Ok(()) => info!(store = store.backend_name(), "knowledge store reachable"),
        Err(e) => warn!(store = store.backend_name(), "knowledge store unreachable at startup: {e}"),
    }

    let snapshot = if config.knowledge.snapshot_fallback {
        Some(Arc::new(KnowledgeSnapshot::load(&store, seed_entries).await))
    } else {
        None
    };

    let chat = ChatService::new(store, snapshot);

    // Shared shutdown token; Ctrl-C cancels it, all tasks watch it.
    let shutdown = CancellationToken::new();

    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let ui_handle = ui::start(&config);

    print_startup_summary(&config, &chat, ui_handle.is_some());

    let comms = comms::start(&config, chat, ui_handle, shutdown.clone());
    comms.join().await?;

    shutdown.cancel();
    let _ = {
        use std::io::Write as _;
        std::io::stderr().flush()
    };

    Ok(())
}

fn print_startup_summary(config: &config::Config, chat: &ChatService, ui_loaded: bool) {
    let fit = |text: String| -> String {
        const WIDTH: usize = 58;
        let char_count = text.chars().count();
        if char_count >= WIDTH {
            let mut out = text.chars().take(WIDTH - 1).collect::<String>();
            out.push('…');
            out
        } else {
            format!("{text:<WIDTH$}")
        }
    };

    let pid = std::process::id();

    let store_line = match chat.store() {
        KnowledgeStore::Local(local) => format!("local ({} entries)", local.len()),
        #[cfg(feature = "store-supabase")]
        KnowledgeStore::Supabase(_) => format!(
            "supabase {} (timeout {}s)",
            config.store.supabase.knowledge_table, config.store.supabase.timeout_seconds
        ),
    };
    let snapshot_line = match chat.snapshot_len() {
        Some(n) => format!("snapshot fallback: {n} entries"),
        None => "snapshot fallback: off".to_string(),
    };

    let ui_line = if !ui_loaded {
        "disabled".to_string()
    } else if config.ui.mode == config::UiMode::Development {
        format!("development → {}", config.ui.dev_server_url)
    } else {
        format!("production from {}", config.ui.static_dir.display())
    };

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ 🤖 YVI Assistant                                             ║");
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ 🧾 Bot: {:<52}║", config.bot_name);
    println!("║ 🧠 PID: {:<52}║", pid);
    println!("║ 🌐 HTTP: {:<51}║", config.server.bind);
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ 📚 Knowledge                                                 ║");
    println!("║   {}║", fit(store_line));
    println!("║   {}║", fit(snapshot_line));
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ 🖼️  UI                                                       ║");
    println!("║   {}║", fit(ui_line));
    println!("╚══════════════════════════════════════════════════════════════╝");
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: yvi-bot [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
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

    // Each -v raises verbosity one tier:
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

    CliArgs { log_level, config_path }
}
