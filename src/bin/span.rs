//! Entry point for the **hyprcascade-span** toggle.
//!
//! One shot per invocation — bind it to a key.  The per-window state
//! lives in `$XDG_RUNTIME_DIR/hyprcascade/` as one snapshot file per
//! window address, plus an operator-facing `span.log`.

use hyprcascade::config::Config;
use hyprcascade::hyprland::ctl::HyprlandCtl;
use hyprcascade::span::{DiagLog, SnapshotStore, SpanToggle};
use log::{error, info};

/// Resolve the config directory (`$XDG_CONFIG_HOME/hyprcascade`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("hyprcascade")
}

/// Resolve the runtime state directory for snapshots and the diag log.
fn state_dir() -> std::path::PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    std::path::PathBuf::from(runtime).join("hyprcascade")
}

fn main() {
    env_logger::init();

    let config = match Config::load(&config_dir().join("config.json")) {
        Ok(cfg) => cfg,
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    };

    let dir = state_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        error!("cannot create state dir {}: {}", dir.display(), e);
        std::process::exit(1);
    }

    let toggle = SpanToggle::new(
        HyprlandCtl::new(),
        SnapshotStore::new(&dir),
        config.span,
        DiagLog::new(dir.join("span.log")),
    );

    match toggle.toggle() {
        Ok(outcome) => info!("{:?}", outcome),
        Err(e) => {
            error!("toggle failed: {}", e);
            std::process::exit(1);
        }
    }
}
