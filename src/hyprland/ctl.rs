//! [`Compositor`] implementation backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! avoiding any shell command invocation or third-party crate for socket
//! discovery.

use crate::event::{ClientInfo, Geometry, MonitorInfo};
use crate::traits::Compositor;
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Hyprland-backed compositor handle.
///
/// All communication happens over Hyprland's IPC socket
/// (`$XDG_RUNTIME_DIR/hypr/<instance>/.socket.sock`).  No child processes
/// are spawned.
pub struct HyprlandCtl;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandCtlError(String);

impl Default for HyprlandCtl {
    fn default() -> Self {
        Self
    }
}

impl HyprlandCtl {
    /// Create a new handle.
    ///
    /// No connection is opened eagerly; each method call opens a
    /// short-lived IPC request.
    pub fn new() -> Self {
        Self
    }
}

//  Direct Hyprland IPC helpers

/// Resolve the Hyprland command socket path.
///
/// Hyprland ≥ 0.40 stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
fn socket_path() -> Result<PathBuf, HyprlandCtlError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandCtlError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandCtlError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket.sock",
        runtime_dir, his
    )))
}

/// Send a raw command to the Hyprland command socket and return the
/// response as a string.
fn ipc_request(command: &str) -> Result<String, HyprlandCtlError> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path)
        .map_err(|e| HyprlandCtlError(format!("connect to {}: {}", path.display(), e)))?;

    stream
        .write_all(command.as_bytes())
        .map_err(|e| HyprlandCtlError(format!("write: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .map_err(|e| HyprlandCtlError(format!("read: {}", e)))?;

    String::from_utf8(response).map_err(|e| HyprlandCtlError(format!("utf-8: {}", e)))
}

/// Send a JSON data query (`j/<command>`) and return the raw JSON string.
fn ipc_json(data_command: &str) -> Result<String, HyprlandCtlError> {
    ipc_request(&format!("j/{}", data_command))
}

/// Send a dispatch command and check for `"ok"`.
fn ipc_dispatch(args: &str) -> Result<(), HyprlandCtlError> {
    let response = ipc_request(&format!("/dispatch {}", args))?;
    if response.trim() == "ok" {
        Ok(())
    } else {
        Err(HyprlandCtlError(format!("dispatch error: {}", response)))
    }
}

//  Minimal serde structs for the JSON we care about

/// Subset of the JSON object returned per entry of `j/clients` (and by
/// `j/activewindow`).
///
/// A missing or non-numeric geometry field fails deserialization, which
/// the engines treat as a malformed query result and skip.
#[derive(Deserialize)]
struct ClientJson {
    address: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    title: String,
    at: [i32; 2],
    size: [i32; 2],
}

impl From<ClientJson> for ClientInfo {
    fn from(c: ClientJson) -> Self {
        ClientInfo {
            address: c.address,
            class: c.class,
            title: c.title,
            geometry: Geometry {
                x: c.at[0],
                y: c.at[1],
                width: c.size[0],
                height: c.size[1],
            },
        }
    }
}

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Deserialize)]
struct MonitorJson {
    name: String,
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    #[serde(default)]
    focused: bool,
}

impl From<MonitorJson> for MonitorInfo {
    fn from(m: MonitorJson) -> Self {
        MonitorInfo {
            name: m.name,
            width: m.width,
            height: m.height,
            x: m.x,
            y: m.y,
            focused: m.focused,
        }
    }
}

//  Compositor implementation

impl Compositor for HyprlandCtl {
    type Error = HyprlandCtlError;

    fn client(&self, address: &str) -> Result<Option<ClientInfo>, Self::Error> {
        let json = ipc_json("clients")?;
        let clients: Vec<ClientJson> =
            serde_json::from_str(&json).map_err(|e| HyprlandCtlError(format!("parse: {}", e)))?;
        Ok(clients
            .into_iter()
            .find(|c| c.address == address)
            .map(ClientInfo::from))
    }

    fn active_window(&self) -> Result<Option<ClientInfo>, Self::Error> {
        let json = ipc_json("activewindow")?;
        // Hyprland returns an empty object `{}` when no window is focused.
        if json.trim() == "{}" {
            return Ok(None);
        }
        let w: ClientJson =
            serde_json::from_str(&json).map_err(|e| HyprlandCtlError(format!("parse: {}", e)))?;
        Ok(Some(w.into()))
    }

    fn focused_monitor(&self) -> Result<Option<MonitorInfo>, Self::Error> {
        let json = ipc_json("monitors")?;
        let monitors: Vec<MonitorJson> =
            serde_json::from_str(&json).map_err(|e| HyprlandCtlError(format!("parse: {}", e)))?;
        Ok(monitors
            .into_iter()
            .find(|m| m.focused)
            .map(MonitorInfo::from))
    }

    fn move_window(&self, address: &str, x: i32, y: i32) -> Result<(), Self::Error> {
        ipc_dispatch(&format!("movewindowpixel exact {} {},address:{}", x, y, address))
    }

    fn resize_window(&self, address: &str, width: i32, height: i32) -> Result<(), Self::Error> {
        ipc_dispatch(&format!(
            "resizewindowpixel exact {} {},address:{}",
            width, height, address
        ))
    }

    fn float_active(&self) -> Result<(), Self::Error> {
        ipc_dispatch("setfloating active")
    }

    fn resize_active(&self, width: i32, height: i32) -> Result<(), Self::Error> {
        ipc_dispatch(&format!("resizeactive exact {} {}", width, height))
    }

    fn center_active(&self) -> Result<(), Self::Error> {
        ipc_dispatch("centerwindow")
    }

    fn move_active(&self, x: i32, y: i32) -> Result<(), Self::Error> {
        ipc_dispatch(&format!("moveactive exact {} {}", x, y))
    }
}
