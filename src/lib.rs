//! **hyprcascade** — cascade auto-placement and a span toggle for
//! Hyprland.
//!
//! Two binaries share this library:
//!
//! * `hyprcascade` — a daemon that watches the compositor's event socket
//!   and places every eligible new window on a deterministic diagonal
//!   cascade, tracking windows across their open/close lifecycle.
//! * `hyprcascade-span` — a one-shot toggle that saves the active
//!   window's geometry, stretches it across the monitor below the
//!   reserved bar, and restores the saved geometry on the next press.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::Compositor`] — abstracts window queries and move / resize
//!   dispatch so the engines are not coupled to any specific compositor.
//! * [`traits::EventSource`] — abstracts the transport that delivers
//!   window lifecycle events so the main loop is not coupled to any
//!   specific IPC mechanism.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC).  The
//! engines themselves ([`cascade::CascadePlacer`] and
//! [`span::SpanToggle`]) are pure orchestration over those traits plus
//! the state in [`registry`] and on disk.

pub mod cascade;
pub mod config;
pub mod event;
pub mod hyprland;
pub mod registry;
pub mod span;
pub mod traits;
