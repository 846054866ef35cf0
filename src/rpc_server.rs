//! Mediamarks RPC Server: JSON-RPC over stdin/stdout for a desktop or web front end.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"tag.new", "params":{"label":"travel"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries protocol messages only.

use std::path::PathBuf;
use std::process::ExitCode;

use mediamarks::app::App;
use mediamarks::platform;
use mediamarks::rpc_handler::handle_line;
use mediamarks::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn send(stdout: &mut Stdout, message: &Value) -> io::Result<()> {
    let mut line = message.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

fn init_app() -> Result<App, String> {
    let mut engine = SettingsEngine::new(std::env::var("MEDIAMARKS_CONFIG").ok());
    let settings = engine.load().map_err(|e| e.to_string())?;
    info!(path = engine.get_config_path(), "settings ready");

    let data_dir = std::env::var("MEDIAMARKS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| platform::get_data_dir());
    App::open(settings, &data_dir).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let app = match init_app() {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "failed to initialize mediamarks");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout();
    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if send(&mut stdout, &ready).await.is_err() {
        return ExitCode::FAILURE;
    }

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&app, &line).await;

        if let Err(e) = send(&mut stdout, &response).await {
            warn!(error = %e, "stdout write failed");
            break;
        }
    }

    info!("stdin closed, shutting down");
    ExitCode::SUCCESS
}
