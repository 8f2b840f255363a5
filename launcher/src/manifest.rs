//! The discovery manifest (§6.3): `ACTIVE_MCPS=key1,key2,…`, the contract
//! between the launcher and the orchestrator.

use std::fs;
use std::path::Path;

pub const ACTIVE_MCPS_VAR: &str = "ACTIVE_MCPS";

/// Joins the active keys into the comma-separated value carried by the
/// `ACTIVE_MCPS` environment variable and the launcher's positional argument.
pub fn active_mcps_value(keys: &[String]) -> String {
    keys.join(",")
}

/// Parses `ACTIVE_MCPS=key1,key2` (or a bare `key1,key2`) back into keys,
/// skipping blank entries from stray commas.
pub fn parse_active_mcps(raw: &str) -> Vec<String> {
    let value = raw.strip_prefix(ACTIVE_MCPS_VAR).and_then(|s| s.strip_prefix('=')).unwrap_or(raw);
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Writes the manifest file an orchestrator can read in place of (or in
/// addition to) inheriting the `ACTIVE_MCPS` environment variable.
pub fn write_manifest(path: &Path, keys: &[String]) -> std::io::Result<()> {
    fs::write(path, format!("{ACTIVE_MCPS_VAR}={}\n", active_mcps_value(keys)))
}

/// Reads a manifest file previously written by [`write_manifest`].
pub fn read_manifest(path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_active_mcps(content.trim()))
}
