//! Reads the Hyprland event socket and turns its lines into [`Event`]s.
//!
//! Hyprland emits window lifecycle notifications over its IPC event
//! socket (`socket2`) in the `EVENT>>DATA\n` format, one event per line,
//! at `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`.
//!
//! [`HyprlandEventSource`] connects to this socket, parses each line with
//! [`parse_event_line`](crate::event::parse_event_line), and forwards the
//! result into the sink.  When the socket closes — typically because
//! Hyprland itself exited — the source fails with a stream-closed error
//! and the daemon exits.  There is no reconnection; restarting is left to
//! whatever supervises the daemon.

use crate::event::{parse_event_line, Event};
use crate::traits::EventSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::mpsc;

/// An [`EventSource`] that listens to Hyprland's raw IPC event socket.
#[derive(Debug, Default)]
pub struct HyprlandEventSource {
    /// Explicit socket path; `None` resolves the Hyprland socket from the
    /// environment when [`run`](EventSource::run) is called.
    path: Option<PathBuf>,
}

impl HyprlandEventSource {
    /// Create a source that resolves the socket path from the
    /// environment at run time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source reading from an explicit socket path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

/// Error from the Hyprland event source.
#[derive(Debug, thiserror::Error)]
#[error("hyprland event stream error: {0}")]
pub struct HyprlandEventError(String);

/// Resolve the Hyprland event socket path.
///
/// Hyprland stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`.
fn socket2_path() -> Result<PathBuf, HyprlandEventError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandEventError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandEventError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket2.sock",
        runtime_dir, his
    )))
}

impl EventSource for HyprlandEventSource {
    type Error = HyprlandEventError;

    /// Connect to Hyprland's event socket and forward events until the
    /// stream closes.
    ///
    /// This method **blocks**.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Event>) -> Result<(), Self::Error> {
        let path = match &self.path {
            Some(p) => p.clone(),
            None => socket2_path()?,
        };
        let stream = UnixStream::connect(&path)
            .map_err(|e| HyprlandEventError(format!("connect to {}: {}", path.display(), e)))?;
        info!("listening on {}", path.display());
        let reader = BufReader::new(stream);

        for line in reader.lines() {
            match line {
                Ok(line) if line.is_empty() => continue,
                Ok(line) => {
                    let event = parse_event_line(&line);
                    if event != Event::Other {
                        debug!("event: {:?}", event);
                    }
                    if sink.send(event).is_err() {
                        info!("sink closed, shutting down");
                        return Ok(());
                    }
                }
                Err(e) => {
                    error!("socket2 read error: {}", e);
                    return Err(HyprlandEventError(format!("read error: {}", e)));
                }
            }
        }

        // EOF: Hyprland closed the socket (usually compositor shutdown).
        Err(HyprlandEventError("event stream closed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixListener;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "hyprcascade-test-{}-{}.sock",
            std::process::id(),
            id
        ))
    }

    /// Run the source against a fixture socket that emits `lines` and
    /// hangs up.
    fn run_against(lines: &[&str]) -> (Vec<Event>, Result<(), HyprlandEventError>) {
        let path = tmp_socket_path();
        let listener = UnixListener::bind(&path).expect("bind");
        let payload: String = lines.iter().map(|l| format!("{}\n", l)).collect();

        let writer = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            stream.write_all(payload.as_bytes()).unwrap();
            // Dropping the stream closes the socket: EOF on the reader.
        });

        let (tx, rx) = mpsc::channel();
        let mut source = HyprlandEventSource::with_path(&path);
        let result = source.run(tx);

        writer.join().unwrap();
        let _ = std::fs::remove_file(&path);
        (rx.try_iter().collect(), result)
    }

    #[test]
    fn forwards_parsed_events_in_order() {
        let (events, result) = run_against(&[
            "openwindow>>abc,1,kitty,shell",
            "workspace>>2",
            "closewindow>>abc",
        ]);
        // EOF surfaces as a stream-closed error so the daemon exits.
        assert!(result.is_err());
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], Event::WindowOpened { .. }));
        assert_eq!(events[1], Event::Other);
        assert_eq!(
            events[2],
            Event::WindowClosed {
                address: "0xabc".into()
            }
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (events, _) = run_against(&["", "closewindow>>abc", ""]);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            Event::WindowClosed {
                address: "0xabc".into()
            }
        );
    }

    #[test]
    fn closed_sink_ends_the_source_cleanly() {
        let path = tmp_socket_path();
        let listener = UnixListener::bind(&path).expect("bind");

        let writer = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            stream.write_all(b"closewindow>>abc\n").unwrap();
        });

        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut source = HyprlandEventSource::with_path(&path);
        // With the receiver gone, the first send fails and run returns Ok.
        assert!(source.run(tx).is_ok());

        writer.join().unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn connect_to_missing_socket_is_an_error() {
        let (tx, _rx) = mpsc::channel();
        let mut source = HyprlandEventSource::with_path("/nonexistent/hypr.sock");
        assert!(source.run(tx).is_err());
    }
}
