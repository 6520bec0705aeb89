use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Attachment resolution settings loaded from `~/.config/apprise-attach/config.toml`.
///
/// All fields have defaults, so a partial (or missing) config file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachConfig {
    /// Restrict the MIME table to officially registered types only. When
    /// false, a small set of common but unregistered types is recognized too.
    pub strict: bool,
    /// Maximum accepted attachment size in bytes. 0 disables the check.
    /// 1 MB = 1048576 bytes, 5 MB = 5242880 bytes.
    pub max_file_size: u64,
    /// Maximum bytes read into memory for content-type sniffing (128 KB).
    pub max_detect_buffer_size: usize,
    /// MIME type reported when inference fails entirely.
    pub unknown_mimetype: String,
    /// Filename stem used when no name can be determined.
    pub unknown_filename: String,
    /// Filename extension used when none can be guessed from the MIME type.
    pub unknown_filename_extension: String,
}

impl Default for AttachConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_file_size: 5 * 1024 * 1024,
            max_detect_buffer_size: 128 * 1024,
            unknown_mimetype: "application/octet-stream".to_string(),
            unknown_filename: "apprise-attachment".to_string(),
            unknown_filename_extension: ".obj".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("apprise-attach")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AttachConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AttachConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: AttachConfig = toml::from_str(&data)?;
    Ok(cfg)
}
