use chrono::NaiveDate;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ROUNDUP_DIR: &str = ".roundup";
pub const LOCKS_DIR: &str = ".roundup/locks";

pub const CONFIG_FILE: &str = ".roundup/config.yaml";
pub const ROSTER_FILE: &str = ".roundup/roster.yaml";
pub const RESPONSES_FILE: &str = ".roundup/responses.jsonl";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn roundup_dir(root: &Path) -> PathBuf {
    root.join(ROUNDUP_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn locks_dir(root: &Path) -> PathBuf {
    root.join(LOCKS_DIR)
}

/// Lock marker for `namespace` on `date`, e.g. `.roundup/locks/dispatch-2025-03-01.lock`.
pub fn lock_path(dir: &Path, namespace: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{namespace}-{}.lock", date.format("%Y-%m-%d")))
}

/// Resolve a configured path: absolute paths are kept, relative ones hang off `root`.
pub fn resolve(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
