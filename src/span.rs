//! Span toggle: save a window's geometry, stretch it across the monitor
//! below the reserved bar, and restore it on the next invocation.
//!
//! Each invocation is a fresh process (the tool is bound to a key), so
//! the per-window state machine lives on disk as one JSON file per
//! window address:
//!
//! * no snapshot on disk: the window is in its natural state; toggling
//!   saves the current geometry and spans the window;
//! * snapshot present: the window was spanned; toggling restores the
//!   saved geometry and deletes the snapshot.
//!
//! Before restoring, the live geometry is compared against the recorded
//! span target.  If the user moved or resized the window in the
//! meantime (drift), the snapshot no longer describes reality: it is
//! discarded and the window is spanned fresh instead.
//!
//! The snapshot store does no file locking; two invocations racing on
//! the same address (a very fast double key-press) can interleave.

use crate::event::{ClientInfo, Geometry};
use crate::traits::Compositor;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Bar layout and drift tuning.
///
/// The defaults match a 43-px top bar with its reserved area doubled by
/// the compositor: 86 px of reserved height, the spanned window starting
/// at `y = 86/2 + 1 = 44`, and a drift tolerance of half the reserved
/// height.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanConfig {
    /// Vertical pixels reserved for the bar.  Default: `86`.
    pub bar_height: i32,
    /// Extra offset applied when restoring below the bar.  Default: `1`.
    pub restore_offset: i32,
    /// Maximum per-axis deviation from the span target before the
    /// snapshot is considered stale.  Default: `43`.
    pub drift_tolerance: i32,
}

impl Default for SpanConfig {
    fn default() -> Self {
        Self {
            bar_height: 86,
            restore_offset: 1,
            drift_tolerance: 43,
        }
    }
}

/// Persisted record of a spanned window's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    /// Geometry the window had before it was spanned.
    pub original: Geometry,
    /// Geometry the span dispatched.
    pub target: Geometry,
}

/// Errors from reading or writing the snapshot store.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Filesystem failure.
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    /// The snapshot file exists but does not parse as a geometry pair.
    /// The file is left on disk untouched.
    #[error("malformed snapshot {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The snapshot could not be encoded.
    #[error("snapshot encode error: {0}")]
    Encode(serde_json::Error),
}

/// One JSON file per window address under a fixed directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `dir`.  The directory must already exist.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the snapshot file for `address`.
    pub fn path_for(&self, address: &str) -> PathBuf {
        self.dir.join(format!("span-{}.json", address))
    }

    /// Load the snapshot for `address`, if one exists.
    ///
    /// A file that fails to parse yields [`SnapshotError::Malformed`] and
    /// is **not** deleted — the operator may want to inspect it.
    pub fn load(&self, address: &str) -> Result<Option<GeometrySnapshot>, SnapshotError> {
        let path = self.path_for(address);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_str(&contents)
            .map_err(|source| SnapshotError::Malformed { path, source })?;
        Ok(Some(snapshot))
    }

    /// Persist the snapshot for `address`, replacing any previous one.
    pub fn save(&self, address: &str, snapshot: &GeometrySnapshot) -> Result<(), SnapshotError> {
        let json = serde_json::to_string(snapshot).map_err(SnapshotError::Encode)?;
        std::fs::write(self.path_for(address), json)?;
        Ok(())
    }

    /// Delete the snapshot for `address`.  Missing files are fine.
    pub fn remove(&self, address: &str) -> Result<(), SnapshotError> {
        match std::fs::remove_file(self.path_for(address)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Append-only operator-facing log.
///
/// One line per decision, prefixed with a unix timestamp.  Nothing reads
/// this file back; write failures are logged and never abort the toggle.
#[derive(Debug, Clone)]
pub struct DiagLog {
    path: PathBuf,
}

impl DiagLog {
    /// Create a log writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one line.
    pub fn record(&self, message: &str) {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "[{}] {}", ts, message));
        if let Err(e) = result {
            warn!("diag log write failed: {}", e);
        }
    }
}

/// Outcome of one toggle invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// No snapshot existed; the window was spanned and its geometry saved.
    Spanned,
    /// The snapshot matched the live geometry; the window was restored
    /// and the snapshot deleted.
    Restored,
    /// The live geometry had drifted from the span target; the stale
    /// snapshot was discarded and the window spanned fresh.
    Reapplied,
}

/// Possible errors from the toggle.
#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    /// The compositor returned an error.
    #[error("compositor error: {0}")]
    Compositor(String),
    /// No window has focus — nothing to toggle.
    #[error("no active window")]
    NoActiveWindow,
    /// The compositor reports no focused monitor.
    #[error("no focused monitor")]
    NoFocusedMonitor,
    /// Snapshot store failure.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// The span/restore state machine for the currently active window.
pub struct SpanToggle<C: Compositor> {
    comp: C,
    store: SnapshotStore,
    config: SpanConfig,
    diag: DiagLog,
}

impl<C: Compositor> SpanToggle<C> {
    /// Create a toggle over the given compositor and snapshot store.
    pub fn new(comp: C, store: SnapshotStore, config: SpanConfig, diag: DiagLog) -> Self {
        Self {
            comp,
            store,
            config,
            diag,
        }
    }

    /// Run one toggle for the active window.
    pub fn toggle(&self) -> Result<ToggleOutcome, ToggleError> {
        let active = self
            .comp
            .active_window()
            .map_err(|e| ToggleError::Compositor(e.to_string()))?
            .ok_or(ToggleError::NoActiveWindow)?;

        match self.store.load(&active.address)? {
            None => {
                self.span(&active)?;
                self.diag
                    .record(&format!("{} spanned from {:?}", active.address, active.geometry));
                Ok(ToggleOutcome::Spanned)
            }
            Some(snapshot) => {
                if self.within_tolerance(&active.geometry, &snapshot.target) {
                    self.restore(&active, &snapshot)?;
                    self.diag
                        .record(&format!("{} restored to {:?}", active.address, snapshot.original));
                    Ok(ToggleOutcome::Restored)
                } else {
                    // The user moved or resized the window since the span;
                    // the snapshot no longer describes reality.
                    debug!(
                        "{} drifted: live {:?} vs target {:?}",
                        active.address, active.geometry, snapshot.target
                    );
                    self.store.remove(&active.address)?;
                    self.span(&active)?;
                    self.diag
                        .record(&format!("{} drifted, snapshot discarded, re-spanned", active.address));
                    Ok(ToggleOutcome::Reapplied)
                }
            }
        }
    }

    /// Whether every axis of `live` is within the drift tolerance of
    /// `target`.
    fn within_tolerance(&self, live: &Geometry, target: &Geometry) -> bool {
        let tol = self.config.drift_tolerance;
        (live.width - target.width).abs() <= tol
            && (live.height - target.height).abs() <= tol
            && (live.x - target.x).abs() <= tol
            && (live.y - target.y).abs() <= tol
    }

    /// Geometry the span stretches the window to on the given monitor:
    /// full width, full height minus the reserved bar, top-left at
    /// `(0, bar_height/2 + 1)`.
    fn span_target(&self, monitor_width: i32, monitor_height: i32) -> Geometry {
        Geometry {
            x: 0,
            y: self.config.bar_height / 2 + 1,
            width: monitor_width,
            height: monitor_height - self.config.bar_height,
        }
    }

    /// Save the window's geometry and stretch it across the monitor.
    fn span(&self, active: &ClientInfo) -> Result<(), ToggleError> {
        let monitor = self
            .comp
            .focused_monitor()
            .map_err(|e| ToggleError::Compositor(e.to_string()))?
            .ok_or(ToggleError::NoFocusedMonitor)?;

        let target = self.span_target(monitor.width, monitor.height);
        self.store.save(
            &active.address,
            &GeometrySnapshot {
                original: active.geometry,
                target,
            },
        )?;

        let comp = |r: Result<(), C::Error>| r.map_err(|e| ToggleError::Compositor(e.to_string()));
        comp(self.comp.float_active())?;
        comp(self.comp.resize_active(target.width, target.height))?;
        // centerwindow is immediately overridden by the exact move below;
        // kept because the layout depends on the intermediate state.
        comp(self.comp.center_active())?;
        comp(self.comp.move_active(target.x, target.y))?;

        info!("spanned {} to {:?}", active.address, target);
        Ok(())
    }

    /// Put the window back where it was, compensating for the bar offset
    /// applied during the span.
    fn restore(&self, active: &ClientInfo, snapshot: &GeometrySnapshot) -> Result<(), ToggleError> {
        let comp = |r: Result<(), C::Error>| r.map_err(|e| ToggleError::Compositor(e.to_string()));
        let original = snapshot.original;
        comp(self.comp.resize_active(original.width, original.height))?;
        comp(self.comp.move_active(
            original.x,
            original.y - self.config.bar_height - self.config.restore_offset,
        ))?;
        self.store.remove(&active.address)?;

        info!("restored {} to {:?}", active.address, original);
        Ok(())
    }
}
