mod cli;
mod shell;

use std::path::PathBuf;
use std::time::Duration;

use easel_common::PanelId;
use easel_config::{PackageWatcher, ShellConfig};
use easel_package::FsScriptHost;
use easel_window::HeadlessFactory;
use tokio::sync::mpsc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use shell::Shell;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Config is read before logging starts so its level can apply; the
    // outcome is logged once the subscriber is up.
    let loaded = match &args.config {
        Some(path) => easel_config::toml_loader::load_from_path(path)
            .and_then(|c| easel_config::validation::validate(&c).map(|()| c)),
        None => easel_config::load_config(),
    };

    let fallback = match &loaded {
        Ok(config) => format!("easel={}", config.logging.level),
        Err(_) => "easel=info".to_string(),
    };
    let log_directive = args.log_level.clone().unwrap_or(fallback);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("Easel v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        ShellConfig::default()
    });
    config.packages.search_paths.extend(args.paths.iter().cloned());
    let watch = args.watch || config.watch.enabled;
    let debounce = Duration::from_millis(config.watch.debounce_ms);

    let mut shell = Shell::new(
        config,
        Box::new(HeadlessFactory::new()),
        Box::new(FsScriptHost),
    );
    shell.start();

    for root in &args.load {
        if let Err(e) = shell.load_package(root) {
            tracing::error!(path = %root.display(), error = %e, "failed to load package");
        }
    }

    for raw in &args.open {
        let opened = raw
            .parse::<PanelId>()
            .and_then(|panel| shell.open_panel(&panel, Vec::new()));
        if let Err(e) = opened {
            tracing::error!(panel = %raw, error = %e, "failed to open panel");
        }
    }

    if watch {
        run_watch_loop(&mut shell, debounce).await;
    }

    shell.shutdown();
    tracing::info!("Shutdown complete");
}

/// Reload packages as their files change until interrupted or the main
/// window closes.
async fn run_watch_loop(shell: &mut Shell, debounce: Duration) {
    let roots: Vec<PathBuf> = shell
        .packages()
        .loaded_names()
        .iter()
        .filter_map(|name| shell.packages().find(name))
        .map(|package| package.root().to_path_buf())
        .collect();

    let watcher = match PackageWatcher::new(roots, debounce) {
        Ok(watcher) => watcher,
        Err(e) => {
            tracing::error!("Package watcher failed to start: {e}");
            return;
        }
    };

    let (tx, mut rx) = mpsc::channel(32);
    tokio::spawn(async move {
        if let Err(e) = watcher.watch(tx).await {
            tracing::error!("Package watcher stopped: {e}");
        }
    });

    tracing::info!("Watching packages for changes (Ctrl-C to quit)");
    loop {
        tokio::select! {
            Some(root) = rx.recv() => {
                if shell.reload_package(&root).is_ok() {
                    tracing::info!(path = %root.display(), "package reloaded");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
        if shell.should_exit() {
            break;
        }
    }
}
