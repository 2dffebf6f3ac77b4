//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution:
//! `~/Library/Application Support/rover-voice/` on macOS,
//! `~/.config/rover-voice/` on Linux.
//!
//! Override with the `ROVER_VOICE_CONFIG_DIR` environment variable for
//! testing or custom deployments.

use std::path::PathBuf;

/// Application config directory, holding `config.toml`.
///
/// Resolves to `dirs::config_dir()/rover-voice/` by default. Override with
/// the `ROVER_VOICE_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("ROVER_VOICE_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("rover-voice"))
        .unwrap_or_else(|| PathBuf::from("/tmp/rover-voice-config"))
}
