//! The cascade placement engine.
//!
//! [`CascadePlacer`] owns the [`Registry`] and [`CascadeCursor`] and
//! reacts to [`Event`]s by classifying new windows and issuing move /
//! resize calls through the [`Compositor`] trait.
//!
//! Placement is deterministic: eligible windows land on a diagonal
//! starting at the cursor base, each subsequent window offset by the
//! step, wrapping after `max_cascade` placements.  Small windows and
//! untitled windows (dialogs, popups, splash screens) are left where the
//! compositor put them.

use crate::event::Event;
use crate::registry::{CascadeCursor, Registry};
use crate::traits::Compositor;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Tuning knobs for cascade placement.
///
/// The defaults reproduce the classic layout: a diagonal starting at
/// `(300, 100)`, stepping 30 px per window, wrapping after 10 windows,
/// with every placed window sized 1000×700.  Windows smaller than
/// 200 px on either axis are treated as popups and never placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// X of the first cascade slot.  Default: `300`.
    pub base_x: i32,
    /// Y of the first cascade slot.  Default: `100`.
    pub base_y: i32,
    /// Diagonal offset between consecutive windows.  Default: `30`.
    pub step: i32,
    /// Number of placements before the cursor wraps to the base.
    /// Default: `10`.
    pub max_cascade: u32,
    /// Windows narrower than this are ignored.  Default: `200`.
    pub min_width: i32,
    /// Windows shorter than this are ignored.  Default: `200`.
    pub min_height: i32,
    /// Width every placed window is resized to.  Default: `1000`.
    pub place_width: i32,
    /// Height every placed window is resized to.  Default: `700`.
    pub place_height: i32,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            base_x: 300,
            base_y: 100,
            step: 30,
            max_cascade: 10,
            min_width: 200,
            min_height: 200,
            place_width: 1000,
            place_height: 700,
        }
    }
}

/// Why a window was classified as ineligible for placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Width or height below the configured minimum (a dialog or popup).
    SmallOrPopup,
    /// Empty title or the literal `"null"`: a surface without real
    /// content yet.
    Untitled,
}

/// Outcome of handling one event.
///
/// Every branch of the engine is observable through this type, which is
/// what the tests assert on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The event carried no placement work (unknown tag, or a close for
    /// an address that was never tracked).
    NoOp,
    /// Duplicate `openwindow` for an address already in the registry.
    AlreadyPlaced,
    /// The compositor no longer knows the address — the window closed
    /// between the event and the query.  Logged and skipped, no retry.
    NotFound,
    /// The window was classified as ineligible and left alone.
    Ignored(IgnoreReason),
    /// The window was moved and resized to the given rectangle.
    Placed {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    /// A tracked window closed and was dropped from the registry.
    Forgotten,
}

/// Possible errors from the placer.
#[derive(Debug, thiserror::Error)]
pub enum PlacerError {
    /// The compositor returned an error.
    #[error("compositor error: {0}")]
    Compositor(String),
}

/// Orchestrates window classification, placement, and lifecycle tracking.
///
/// The placer is generic over any [`Compositor`] implementation, making
/// it completely independent of Hyprland or any other concrete backend.
///
/// # Typical usage
///
/// ```ignore
/// let mut placer = CascadePlacer::new(HyprlandCtl::new(), CascadeConfig::default());
/// for event in rx {
///     placer.handle(&event)?;
/// }
/// ```
pub struct CascadePlacer<C: Compositor> {
    comp: C,
    config: CascadeConfig,
    registry: Registry,
    cursor: CascadeCursor,
}

impl<C: Compositor> CascadePlacer<C> {
    /// Create a new placer with an empty registry and the cursor at its
    /// base position.
    pub fn new(comp: C, config: CascadeConfig) -> Self {
        let cursor = CascadeCursor::new(
            config.base_x,
            config.base_y,
            config.step,
            config.max_cascade,
        );
        Self {
            comp,
            config,
            registry: Registry::new(),
            cursor,
        }
    }

    /// Shared access to the registry (for inspection and tests).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Position the next eligible window will be placed at.
    pub fn cursor_position(&self) -> (i32, i32) {
        self.cursor.position()
    }

    /// Number of placements since the cursor last wrapped.
    pub fn cursor_count(&self) -> u32 {
        self.cursor.count()
    }

    /// Process one event from the compositor's event stream.
    pub fn handle(&mut self, event: &Event) -> Result<Decision, PlacerError> {
        match event {
            Event::WindowOpened { address, .. } => self.on_window_opened(address),
            Event::WindowClosed { address } => Ok(self.on_window_closed(address)),
            Event::Other => Ok(Decision::NoOp),
        }
    }

    /// Handle a new window: classify it and, if eligible, place it at the
    /// cursor and advance the cascade.
    fn on_window_opened(&mut self, address: &str) -> Result<Decision, PlacerError> {
        if self.registry.contains(address) {
            debug!("{} already placed, ignoring duplicate open", address);
            return Ok(Decision::AlreadyPlaced);
        }

        // The event payload carries class/title at open time, but the
        // window may have settled since; classify on live metadata.
        let client = self
            .comp
            .client(address)
            .map_err(|e| PlacerError::Compositor(e.to_string()))?;
        let Some(client) = client else {
            warn!("{} not found in client list, skipping", address);
            return Ok(Decision::NotFound);
        };

        if client.geometry.width < self.config.min_width
            || client.geometry.height < self.config.min_height
        {
            debug!(
                "{} is {}x{}, too small, leaving alone",
                address, client.geometry.width, client.geometry.height
            );
            return Ok(Decision::Ignored(IgnoreReason::SmallOrPopup));
        }
        if client.title.is_empty() || client.title == "null" {
            debug!("{} has no usable title, leaving alone", address);
            return Ok(Decision::Ignored(IgnoreReason::Untitled));
        }

        let (x, y) = self.cursor.position();
        let (width, height) = (self.config.place_width, self.config.place_height);

        // Move before resize.  Not atomic: killing the process between
        // the two calls leaves the window moved but not resized.
        self.comp
            .move_window(address, x, y)
            .map_err(|e| PlacerError::Compositor(e.to_string()))?;
        self.comp
            .resize_window(address, width, height)
            .map_err(|e| PlacerError::Compositor(e.to_string()))?;

        self.registry.insert_placed(address);
        self.cursor.advance();

        info!("placed {} at ({}, {}) {}x{}", address, x, y, width, height);
        Ok(Decision::Placed {
            x,
            y,
            width,
            height,
        })
    }

    /// Handle a closed window: forget it so the address can be reused.
    fn on_window_closed(&mut self, address: &str) -> Decision {
        if self.registry.remove(address) {
            debug!("{} closed, dropped from registry", address);
            Decision::Forgotten
        } else {
            Decision::NoOp
        }
    }
}
