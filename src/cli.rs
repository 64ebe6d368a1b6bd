//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rand::RngCore;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::adapters::alpaca_adapter::AlpacaAdapter;
use crate::adapters::chat_completion_adapter::ChatCompletionAdapter;
use crate::adapters::csv_adapter::{load_curated_list, load_lexicon};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::newsapi_adapter::NewsApiAdapter;
use crate::adapters::sqlite_adapter::SqliteAdapter;
use crate::adapters::web::{build_router, AppState};
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::config_validation::{validate_gateway_config, DEFAULT_LISTEN};
use crate::domain::error::GatewayError;
use crate::domain::sentiment::SentimentAnalyzer;
use crate::domain::ticker::CuratedList;
use crate::logging::init_tracing;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "stockgate", about = "Stock trading gateway for the simulator front end")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP gateway
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Check that every required configuration key is present and well formed
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print a random session secret suitable for `[auth] session_secret`
    GenSecret,
}

pub fn run(cli: Cli) -> ExitCode {
    let _ = dotenvy::dotenv();
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::CheckConfig { config } => run_check_config(&config),
        Command::GenSecret => run_gen_secret(),
    }
}

/// Load the INI file and overlay `STOCKGATE_*` environment variables.
pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path)
        .map(FileConfigAdapter::with_process_env)
        .map_err(|err| {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        })
}

fn run_check_config(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match validate_gateway_config(&config) {
        Ok(()) => {
            println!("{}: OK", config_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    }
}

fn run_gen_secret() -> ExitCode {
    let mut key = [0u8; 64];
    rand::rngs::OsRng.fill_bytes(&mut key);
    println!("{}", hex::encode(key));
    ExitCode::SUCCESS
}

fn run_serve(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let level = config
        .get_string("logging", "level")
        .unwrap_or_else(|| "info".to_string());
    let json = config
        .get_string("logging", "format")
        .is_some_and(|f| f.trim().eq_ignore_ascii_case("json"));
    init_tracing(&level, json);

    match serve(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "gateway stopped");
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    }
}

fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, GatewayError> {
    let raw = config
        .get_string("server", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    raw.trim().parse().map_err(|_| GatewayError::ConfigInvalid {
        section: "server".to_string(),
        key: "listen".to_string(),
        reason: format!("'{raw}' is not a socket address"),
    })
}

fn curated_list(config: &dyn ConfigPort) -> Result<CuratedList, GatewayError> {
    match config.get_string("tickers", "curated_path") {
        Some(path) => {
            let list = load_curated_list(Path::new(&path))?;
            info!(path = %path, entries = list.len(), "curated tickers loaded");
            Ok(list)
        }
        None => Ok(CuratedList::default()),
    }
}

fn sentiment_analyzer(config: &dyn ConfigPort) -> Result<SentimentAnalyzer, GatewayError> {
    let analyzer = SentimentAnalyzer::default();
    match config.get_string("sentiment", "lexicon_path") {
        Some(path) => {
            let analyzer = analyzer.with_entries(load_lexicon(Path::new(&path))?);
            info!(path = %path, words = analyzer.lexicon_size(), "sentiment lexicon loaded");
            Ok(analyzer)
        }
        None => Ok(analyzer),
    }
}

/// Construct every collaborator from configuration.
pub fn build_state(config: FileConfigAdapter) -> Result<AppState, GatewayError> {
    let db = Arc::new(SqliteAdapter::from_config(&config)?);
    db.initialize_schema()?;

    let alpaca = Arc::new(AlpacaAdapter::from_config(&config)?);
    if config.get_bool("alpaca", "paper", true) {
        info!("alpaca paper trading");
    } else {
        warn!("alpaca LIVE trading enabled");
    }

    Ok(AppState {
        market_data: Arc::new(YahooAdapter::from_config(&config)?),
        quotes: alpaca.clone(),
        brokerage: alpaca,
        news: Arc::new(NewsApiAdapter::from_config(&config)?),
        chat: Arc::new(ChatCompletionAdapter::from_config(&config)?),
        store: db.clone(),
        identity: db,
        curated: curated_list(&config)?,
        sentiment: sentiment_analyzer(&config)?,
        config: Arc::new(config),
    })
}

/// Validate, build state, then bind and serve until the listener fails.
fn serve(config: FileConfigAdapter) -> Result<(), GatewayError> {
    validate_gateway_config(&config)?;
    let addr = listen_addr(&config)?;
    let state = build_state(config)?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| GatewayError::Provider {
        provider: "runtime".to_string(),
        reason: e.to_string(),
    })?;

    runtime.block_on(async move {
        let router = build_router(state).await?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::ConfigInvalid {
                section: "server".to_string(),
                key: "listen".to_string(),
                reason: format!("cannot bind {addr}: {e}"),
            })?;
        info!(%addr, "gateway listening");
        axum::serve(listener, router)
            .await
            .map_err(|e| GatewayError::Provider {
                provider: "http".to_string(),
                reason: e.to_string(),
            })
    })
}
