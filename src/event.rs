//! Events and types used throughout hyprcascade.
//!
//! This module defines the vocabulary that all components share:
//! [`Event`] describes everything the daemon can receive from the
//! compositor's event socket, and [`Geometry`] / [`ClientInfo`] /
//! [`MonitorInfo`] provide the supporting data types.
//!
//! Hyprland emits one event per line on socket2 in the `EVENT>>DATA\n`
//! format.  The two events we act on:
//!
//! | Event         | Payload                              |
//! |---------------|--------------------------------------|
//! | `openwindow`  | `<address>,<workspace>,<class>,<title>` |
//! | `closewindow` | `<address>`                          |
//!
//! A window title may itself contain commas, so only the first three
//! commas of an `openwindow` payload are field separators — the title is
//! whatever remains.  Addresses arrive without their `0x` prefix and are
//! normalized before use as registry keys.

use serde::{Deserialize, Serialize};

/// A parsed line from the compositor's event socket.
///
/// Produced by [`parse_event_line`] and consumed by the
/// [`CascadePlacer`](crate::cascade::CascadePlacer).  Events the engine
/// does not care about parse to [`Event::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A new window appeared.
    WindowOpened {
        /// Normalized window address (`0x…`).
        address: String,
        /// Workspace name the window opened on.
        workspace: String,
        /// Window class.
        class: String,
        /// Window title.  May contain commas.
        title: String,
    },
    /// A window was destroyed.
    WindowClosed {
        /// Normalized window address (`0x…`).
        address: String,
    },
    /// Any event tag we do not handle.
    Other,
}

/// A window or monitor rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    /// X position on the virtual desktop.
    pub x: i32,
    /// Y position on the virtual desktop.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

/// Live metadata for a single window, queried from the compositor.
///
/// Transient: used to decide eligibility and to snapshot geometry, never
/// persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Window address (`0x…`).
    pub address: String,
    /// Window class.
    pub class: String,
    /// Window title.
    pub title: String,
    /// Current position and size.
    pub geometry: Geometry,
}

/// Static information about a monitor known to the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Unique name the compositor uses for this monitor (e.g. `"DP-1"`).
    pub name: String,
    /// Horizontal resolution in pixels.
    pub width: i32,
    /// Vertical resolution in pixels.
    pub height: i32,
    /// X position on the virtual desktop (pixels).
    pub x: i32,
    /// Y position on the virtual desktop (pixels).
    pub y: i32,
    /// Whether this monitor currently has focus.
    pub focused: bool,
}

/// Normalize a socket2 window address for use as a registry key.
///
/// Socket2 strips the `0x` prefix that the JSON query interface uses;
/// both forms must resolve to the same key.
pub fn normalize_address(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("0x") {
        raw.to_string()
    } else {
        format!("0x{}", raw)
    }
}

/// Parse a single line from the event socket.
///
/// Lines have the form `EVENT>>DATA`.  Lines without the separator,
/// unknown tags, and `openwindow` payloads with fewer than four fields
/// all parse to [`Event::Other`].
pub fn parse_event_line(line: &str) -> Event {
    let Some((tag, data)) = line.split_once(">>") else {
        return Event::Other;
    };
    match tag {
        "openwindow" => {
            // Split at most 3 times: the title is the remainder and may
            // contain commas of its own.
            let mut fields = data.splitn(4, ',');
            match (
                fields.next(),
                fields.next(),
                fields.next(),
                fields.next(),
            ) {
                (Some(address), Some(workspace), Some(class), Some(title)) => {
                    Event::WindowOpened {
                        address: normalize_address(address),
                        workspace: workspace.to_string(),
                        class: class.to_string(),
                        title: title.to_string(),
                    }
                }
                _ => Event::Other,
            }
        }
        "closewindow" => Event::WindowClosed {
            address: normalize_address(data),
        },
        _ => Event::Other,
    }
}
