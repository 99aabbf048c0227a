//! Core traits that decouple hyprcascade from any specific compositor or
//! transport mechanism.
//!
//! Every concrete backend (Hyprland, a test harness, …) implements one of
//! these traits.  The [`CascadePlacer`](crate::cascade::CascadePlacer) and
//! [`SpanToggle`](crate::span::SpanToggle) only depend on these
//! abstractions.

use crate::event::{ClientInfo, Event, MonitorInfo};
use std::sync::mpsc;

/// Abstraction over a compositor that can be queried for window state and
/// told to move, resize, or float windows.
///
/// An implementation might talk to Hyprland via IPC, or it might be a
/// recording stub used in tests.  All calls are synchronous; a slow
/// compositor blocks the caller.
pub trait Compositor {
    /// The error type produced by this compositor.
    type Error: std::error::Error + Send + 'static;

    /// Look up a window by address.
    ///
    /// Returns `Ok(None)` when the compositor does not know the address —
    /// e.g. the window closed between the event and the query.
    fn client(&self, address: &str) -> Result<Option<ClientInfo>, Self::Error>;

    /// Return the currently focused window, or `None` if no window has
    /// focus.
    fn active_window(&self) -> Result<Option<ClientInfo>, Self::Error>;

    /// Return the currently focused monitor, or `None` if the compositor
    /// reports no focused monitor.
    fn focused_monitor(&self) -> Result<Option<MonitorInfo>, Self::Error>;

    /// Move the window with the given address to an exact pixel position.
    fn move_window(&self, address: &str, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Resize the window with the given address to an exact pixel size.
    fn resize_window(&self, address: &str, width: i32, height: i32) -> Result<(), Self::Error>;

    /// Make the focused window floating.
    fn float_active(&self) -> Result<(), Self::Error>;

    /// Resize the focused window to an exact pixel size.
    fn resize_active(&self, width: i32, height: i32) -> Result<(), Self::Error>;

    /// Center the focused window on its monitor.
    fn center_active(&self) -> Result<(), Self::Error>;

    /// Move the focused window to an exact pixel position.
    fn move_active(&self, x: i32, y: i32) -> Result<(), Self::Error>;
}

/// A source of [`Event`]s.
///
/// Implementations listen on some transport — Hyprland's event socket, an
/// in-memory fixture, … — and forward parsed events into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](EventSource::run) **blocks** until the stream is exhausted or
///   an unrecoverable error occurs.  There is no reconnection: when the
///   stream closes, the owning process decides what to do (the daemon
///   exits).
/// * Each received event must be sent through `sink` exactly once, in
///   arrival order.
/// * Implementations must be [`Send`] so they can run on a dedicated
///   thread.
pub trait EventSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Event`] into `sink`.
    ///
    /// This method blocks the calling thread.
    fn run(&mut self, sink: mpsc::Sender<Event>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Geometry;
    use std::cell::RefCell;

    /// A test double that records every dispatch made against it.
    #[derive(Debug, Default)]
    struct MockCompositor {
        moves: RefCell<Vec<(String, i32, i32)>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl Compositor for MockCompositor {
        type Error = MockError;

        fn client(&self, address: &str) -> Result<Option<ClientInfo>, MockError> {
            Ok(Some(ClientInfo {
                address: address.to_string(),
                class: "kitty".into(),
                title: "mock".into(),
                geometry: Geometry {
                    x: 0,
                    y: 0,
                    width: 800,
                    height: 600,
                },
            }))
        }

        fn active_window(&self) -> Result<Option<ClientInfo>, MockError> {
            Ok(None)
        }

        fn focused_monitor(&self) -> Result<Option<MonitorInfo>, MockError> {
            Ok(Some(MonitorInfo {
                name: "MOCK-1".into(),
                width: 1920,
                height: 1080,
                x: 0,
                y: 0,
                focused: true,
            }))
        }

        fn move_window(&self, address: &str, x: i32, y: i32) -> Result<(), MockError> {
            self.moves.borrow_mut().push((address.to_string(), x, y));
            Ok(())
        }

        fn resize_window(&self, _address: &str, _w: i32, _h: i32) -> Result<(), MockError> {
            Ok(())
        }

        fn float_active(&self) -> Result<(), MockError> {
            Ok(())
        }

        fn resize_active(&self, _w: i32, _h: i32) -> Result<(), MockError> {
            Ok(())
        }

        fn center_active(&self) -> Result<(), MockError> {
            Ok(())
        }

        fn move_active(&self, _x: i32, _y: i32) -> Result<(), MockError> {
            Ok(())
        }
    }

    #[test]
    fn mock_compositor_records_moves() {
        let c = MockCompositor::default();
        c.move_window("0xbeef", 300, 100).unwrap();
        assert_eq!(c.moves.borrow().len(), 1);
        assert_eq!(c.moves.borrow()[0], ("0xbeef".into(), 300, 100));
    }

    /// A test double that emits a fixed sequence of events.
    struct MockSource {
        events: Vec<Event>,
    }

    impl EventSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Event>) -> Result<(), MockError> {
            for ev in self.events.drain(..) {
                let _ = sink.send(ev);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_events_in_order() {
        let mut src = MockSource {
            events: vec![
                Event::WindowOpened {
                    address: "0x1".into(),
                    workspace: "1".into(),
                    class: "kitty".into(),
                    title: "t".into(),
                },
                Event::WindowClosed {
                    address: "0x1".into(),
                },
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::WindowOpened { .. }));
        assert!(matches!(events[1], Event::WindowClosed { .. }));
    }
}
