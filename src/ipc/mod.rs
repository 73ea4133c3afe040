//! Unix-socket channel between the settings window and the overlay daemon
//!
//! Wire format: a little-endian `u32` byte count followed by one
//! JSON-encoded message. Every connection carries strictly alternating
//! request/reply pairs, so both ends read and write in lockstep and a
//! client never has more than one request in flight.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

mod messages;
pub use messages::{OverlayRequest, OverlayResponse};

use crate::constants::config::APP_DIR;

/// Upper bound on a single message. A config record is a few hundred bytes;
/// anything bigger means the stream is corrupt.
const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

const SOCKET_NAME: &str = "overlay.sock";

/// Socket location: `$XDG_RUNTIME_DIR/reticle/overlay.sock`, with the
/// per-user cache directory as fallback when no runtime dir is set
pub fn default_socket_path() -> Result<PathBuf> {
    let base = match std::env::var_os("XDG_RUNTIME_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::cache_dir().context("No XDG_RUNTIME_DIR and no cache directory")?,
    };
    Ok(base.join(APP_DIR).join(SOCKET_NAME))
}

/// GUI-side handle over one accepted connection
pub struct OverlayClient {
    pub(crate) stream: UnixStream,
}

impl OverlayClient {
    pub fn connect() -> Result<Self> {
        Self::connect_to(&default_socket_path()?)
    }

    pub fn connect_to(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path)
            .with_context(|| format!("No overlay daemon listening at {}", path.display()))?;
        Ok(Self { stream })
    }

    /// Send one request and block for the matching reply
    pub fn request(&mut self, req: OverlayRequest) -> Result<OverlayResponse> {
        write_message(&mut self.stream, &req)?;
        read_message(&mut self.stream)
    }
}

/// Daemon-side listener; owns the socket file for its lifetime
pub struct OverlayServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl OverlayServer {
    pub fn bind() -> Result<Self> {
        Self::bind_to(default_socket_path()?)
    }

    pub fn bind_to(socket_path: PathBuf) -> Result<Self> {
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }

        // A socket left behind by a crashed daemon would make the bind fail
        if socket_path.exists() {
            std::fs::remove_file(&socket_path).with_context(|| {
                format!("Cannot remove stale socket {}", socket_path.display())
            })?;
        }

        let listener = UnixListener::bind(&socket_path)
            .with_context(|| format!("Cannot bind {}", socket_path.display()))?;

        // The channel moves config data around; keep it owner-only
        std::fs::set_permissions(&socket_path, std::fs::Permissions::from_mode(0o700))
            .context("Cannot restrict socket permissions")?;

        Ok(Self { listener, socket_path })
    }

    /// Block until the GUI connects
    pub fn accept(&self) -> Result<OverlayClient> {
        let (stream, _) = self.listener.accept().context("Accept failed on overlay socket")?;
        Ok(OverlayClient { stream })
    }

    pub fn path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for OverlayServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

pub(crate) fn write_message<T: Serialize>(stream: &mut UnixStream, msg: &T) -> Result<()> {
    let payload = serde_json::to_vec(msg).context("Message does not serialize")?;

    // One write for prefix plus payload so a frame is never split by a
    // concurrent reader seeing a partial flush
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);
    stream.write_all(&frame).context("Socket write failed")?;
    stream.flush().context("Socket flush failed")?;
    Ok(())
}

pub(crate) fn read_message<T: for<'de> Deserialize<'de>>(stream: &mut UnixStream) -> Result<T> {
    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .context("Socket closed while reading message length")?;
    let len = u32::from_le_bytes(len_buf) as usize;

    if len > MAX_MESSAGE_SIZE {
        bail!("Refusing {len} byte message (limit {MAX_MESSAGE_SIZE})");
    }

    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).context("Socket closed mid-message")?;
    serde_json::from_slice(&payload).context("Message does not decode")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_request_round_trip_over_socket() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test.sock");
        let server = OverlayServer::bind_to(path.clone()).unwrap();

        let handle = thread::spawn(move || {
            let mut conn = server.accept().unwrap();
            let req: OverlayRequest = read_message(&mut conn.stream).unwrap();
            assert!(matches!(req, OverlayRequest::GetPosition));
            write_message(&mut conn.stream, &OverlayResponse::Position { x: 12, y: -34 }).unwrap();
        });

        let mut client = OverlayClient::connect_to(&path).unwrap();
        let resp = client.request(OverlayRequest::GetPosition).unwrap();
        assert!(matches!(resp, OverlayResponse::Position { x: 12, y: -34 }));
        handle.join().unwrap();
    }

    #[test]
    fn test_update_config_carries_full_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cfg.sock");
        let server = OverlayServer::bind_to(path.clone()).unwrap();

        let handle = thread::spawn(move || {
            let mut conn = server.accept().unwrap();
            let req: OverlayRequest = read_message(&mut conn.stream).unwrap();
            let OverlayRequest::UpdateConfig(config) = req else {
                panic!("expected UpdateConfig");
            };
            assert_eq!(config.size, 77);
            write_message(&mut conn.stream, &OverlayResponse::Ack).unwrap();
        });

        let config = crate::config::CrosshairConfig {
            size: 77,
            ..crate::config::CrosshairConfig::default()
        };
        let mut client = OverlayClient::connect_to(&path).unwrap();
        let resp = client.request(OverlayRequest::UpdateConfig(config)).unwrap();
        assert!(matches!(resp, OverlayResponse::Ack));
        handle.join().unwrap();
    }

    #[test]
    fn test_server_drop_removes_socket_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gone.sock");
        {
            let _server = OverlayServer::bind_to(path.clone()).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_bind_replaces_stale_socket() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stale.sock");
        std::fs::write(&path, b"").unwrap();

        let server = OverlayServer::bind_to(path.clone()).unwrap();
        assert_eq!(server.path(), path);
    }
}
