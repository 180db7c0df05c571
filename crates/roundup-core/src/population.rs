//! Target population and non-responder computation.
//!
//! Identifiers are compared exactly as supplied: no case folding and no
//! whitespace trimming.

use crate::error::{Result, RoundupError};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    employees: Vec<Option<String>>,
}

/// Starter roster written by `roundup init`.
pub const EXAMPLE_ROSTER: &str = "\
# Everyone expected to submit a monthly activity report.
employees:
  - someone@example.org
";

/// Load everyone expected to respond. A missing roster is a configuration
/// error; blank YAML entries are dropped.
pub fn load_roster(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Err(RoundupError::PopulationMissing(path.to_path_buf()));
    }
    let data = std::fs::read_to_string(path)?;
    let roster: RosterFile = serde_yaml::from_str(&data)?;
    Ok(roster.employees.into_iter().flatten().collect())
}

/// `target − responders`.
pub fn non_responders(target: &BTreeSet<String>, responders: &BTreeSet<String>) -> BTreeSet<String> {
    target.difference(responders).cloned().collect()
}
