//! Process-wide shutdown state.
//!
//! Ctrl+C before `serve` has bound its socket exits right away. Afterwards
//! it flags shutdown and unblocks the server so the request loop can drain.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use tiny_http::Server;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Exit status for a process ended by SIGINT.
const SIGINT_EXIT: i32 = 130;

/// Install the Ctrl+C handler. Call once, before anything blocks.
pub fn setup_shutdown_handler() -> Result<()> {
    ctrlc::set_handler(on_interrupt).context("failed to install Ctrl+C handler")
}

fn on_interrupt() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    match SERVER.get() {
        Some(server) => {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        }
        None => std::process::exit(SIGINT_EXIT),
    }
}

/// Hand the bound server to the Ctrl+C handler. Later calls are ignored.
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}
