use anyhow::{Context, Result};
use jsonedit_history::config::StorageConfig;
use jsonedit_history::editor::Editor;
use jsonedit_history::history::service::HistoryService;
use jsonedit_history::io::fs::RealFs;
use jsonedit_history::router::{JsonRpcRequest, Router};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();
    log::info!("jsonedit-server starting (stdio - JSON-RPC)");

    // 1. Storage location
    let storage = match std::env::args().nth(1) {
        Some(dir) => StorageConfig::new(dir),
        None => StorageConfig::from_env(),
    };
    log::info!("data dir: {}", storage.data_dir.display());

    // 2. History + editor
    let history = HistoryService::open(RealFs, &storage).context("Failed to load configuration")?;
    let editor = Arc::new(Editor::new(RealFs, history));

    // 3. Router
    let router = Router::new(editor);

    // 4. Stdio Loop
    let stdin = io::stdin();
    let lock = stdin.lock();
    let mut stdout = io::stdout();

    for line_res in lock.lines() {
        let line = line_res?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(req) => {
                let response = router.handle_request(&req);
                if req.id.is_none() {
                    continue;
                }
                let resp_str = serde_json::to_string(&response)?;
                writeln!(stdout, "{}", resp_str)?;
                stdout.flush()?;
            }
            Err(e) => {
                log::error!("Failed to parse JSON-RPC: {}", e);
            }
        }
    }

    Ok(())
}
