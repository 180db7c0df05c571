use roundup_core::clock::{Clock, SystemClock};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Serializes appends to the response log.
    pub append_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self::with_clock(root, Arc::new(SystemClock))
    }

    pub fn with_clock(root: PathBuf, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            root,
            clock,
            append_lock: Arc::new(Mutex::new(())),
        }
    }
}
