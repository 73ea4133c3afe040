//! IPC message handler for the overlay daemon
//!
//! The listener thread owns the socket; all overlay state lives on the main
//! loop. Each request is forwarded over a channel together with a one-shot
//! reply sender, and the thread blocks until the main loop answers within
//! the next tick.

use anyhow::{Context, Result};
use std::sync::mpsc;
use tracing::{error, info, warn};

use crate::ipc::{OverlayRequest, OverlayResponse, OverlayServer};

/// A request paired with its reply channel
pub type Command = (OverlayRequest, mpsc::Sender<OverlayResponse>);

/// Spawn the IPC listener thread that accepts GUI connections
pub fn spawn_ipc_listener(
    server: OverlayServer,
    command_tx: mpsc::Sender<Command>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = run_ipc_loop(&server, &command_tx) {
            error!(error = ?e, "IPC listener thread crashed");
        }
    })
}

fn run_ipc_loop(server: &OverlayServer, command_tx: &mpsc::Sender<Command>) -> Result<()> {
    info!(socket = ?server.path(), "IPC listener started");

    loop {
        // Accept connection (blocks until the GUI connects)
        let mut client = server.accept().context("Failed to accept IPC connection")?;
        info!("GUI connected to overlay daemon");

        loop {
            let request: OverlayRequest = match crate::ipc::read_message(&mut client.stream) {
                Ok(request) => request,
                Err(e) => {
                    warn!(error = ?e, "IPC connection closed or error");
                    break;
                }
            };

            let shutting_down = matches!(request, OverlayRequest::Shutdown);
            let (reply_tx, reply_rx) = mpsc::channel();
            if command_tx.send((request, reply_tx)).is_err() {
                warn!("Main loop gone, dropping IPC request");
                return Ok(());
            }

            match reply_rx.recv() {
                Ok(response) => {
                    crate::ipc::write_message(&mut client.stream, &response)?;
                }
                Err(_) => {
                    warn!("Main loop dropped reply channel");
                    break;
                }
            }

            if shutting_down {
                info!("Shutdown acknowledged, stopping IPC listener");
                return Ok(());
            }
        }

        info!("GUI disconnected from overlay daemon");
    }
}
