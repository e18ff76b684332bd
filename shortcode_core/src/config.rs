use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Delimiter;
use crate::ShortcodeError;
use crate::ShortcodeResult;
use crate::scanner::ShortcodeMatcher;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"shortcode.toml",
	".shortcode.toml",
	".config/shortcode.toml",
];

/// Configuration loaded from `shortcode.toml`.
///
/// ```toml
/// [scan]
/// names = ["resource", "resource_link"]
/// delimiter = "percent"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ShortcodeConfig {
	/// Defaults for scanning documents.
	pub scan: ScanConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
	/// Shortcode names to look for.
	pub names: Vec<String>,
	/// Which delimiter the shortcodes use. Defaults to `angle`.
	pub delimiter: Delimiter,
}

impl ShortcodeConfig {
	/// Returns the first config path that exists under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no file exists.
	pub fn load(root: &Path) -> ShortcodeResult<Option<ShortcodeConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			tracing::debug!(root = %root.display(), "no config file found");
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;

		Self::from_toml(&content).map(Some)
	}

	pub fn from_toml(content: &str) -> ShortcodeResult<ShortcodeConfig> {
		toml::from_str(content).map_err(|e| ShortcodeError::ConfigParse(e.to_string()))
	}

	/// A matcher for the configured names, or `None` when no names are
	/// configured.
	pub fn matcher(&self) -> Option<ShortcodeMatcher> {
		if self.scan.names.is_empty() {
			return None;
		}

		Some(ShortcodeMatcher::new(
			self.scan.names.clone(),
			self.scan.delimiter,
		))
	}
}
