//! Entry point for the **hyprcascade** daemon.
//!
//! Spawns the [`EventSource`](hyprcascade::traits::EventSource) on a
//! background thread and processes incoming events on the main thread.
//! One blocking read per iteration; registry and cursor are touched only
//! by this loop, so no locking is needed.
//!
//! When the event stream closes (compositor shutdown), the source thread
//! ends, the channel drains, and the daemon exits.  Restarting is the
//! service manager's job.

use hyprcascade::cascade::CascadePlacer;
use hyprcascade::config::Config;
use hyprcascade::event::Event;
use hyprcascade::hyprland::ctl::HyprlandCtl;
use hyprcascade::hyprland::events::HyprlandEventSource;
use hyprcascade::traits::EventSource;
use log::{debug, error, info};
use std::sync::mpsc;

/// Resolve the config directory (`$XDG_CONFIG_HOME/hyprcascade`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("hyprcascade")
}

/// Try to load the config from `$XDG_CONFIG_HOME/hyprcascade/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    let mut placer = CascadePlacer::new(HyprlandCtl::new(), config.cascade);

    let (tx, rx) = mpsc::channel::<Event>();
    std::thread::spawn(move || {
        let mut source = HyprlandEventSource::new();
        if let Err(e) = source.run(tx) {
            error!("event source error: {}", e);
        }
    });

    info!("hyprcascade running");
    for event in rx {
        match placer.handle(&event) {
            Ok(decision) => debug!("{:?} -> {:?}", event, decision),
            Err(e) => error!("event error: {}", e),
        }
    }
    info!("event stream closed, exiting");
}
