use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::BlocksError;
use crate::BlocksResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"blockyard.toml",
	".blockyard.toml",
	".config/blockyard.toml",
];

/// Directory scanned for block configurations when nothing else is
/// configured.
pub const DEFAULT_BLOCK_DIRECTORY: &str = "views/blocks";

/// Prefix the host puts in front of every block name registered by this
/// layer.
pub const DEFAULT_NAMESPACE: &str = "acf/";

/// Category assigned to blocks whose configuration has none.
pub const DEFAULT_CATEGORY: &str = "theme";

/// Configuration loaded from a `blockyard.toml` file.
///
/// ```toml
/// namespace = "acf/"
/// directories = ["views/blocks"]
/// default_category = "theme"
///
/// [theme]
/// template = "."
/// stylesheet = "child"
///
/// [site]
/// url = "https://example.com"
/// root = "."
///
/// [extensions]
/// config = "yml"
/// template = "twig"
/// preview = "jpg"
/// ```
#[derive(Debug, Deserialize)]
pub struct BlockyardConfig {
	/// Prefix of registered block names, e.g. `acf/`.
	#[serde(default = "default_namespace")]
	pub namespace: String,
	/// Logical directories searched for block configurations. These are
	/// resolved against the child theme first and the parent theme second.
	#[serde(default = "default_directories")]
	pub directories: Vec<String>,
	/// Category used when a block configuration does not name one.
	#[serde(default = "default_category")]
	pub default_category: String,
	/// Theme roots used to resolve directories and templates.
	#[serde(default)]
	pub theme: ThemeConfig,
	/// Public site location used to turn preview images into URLs.
	#[serde(default)]
	pub site: SiteConfig,
	/// File extensions for the files that make up a block.
	#[serde(default)]
	pub extensions: ExtensionsConfig,
}

impl Default for BlockyardConfig {
	fn default() -> Self {
		Self {
			namespace: default_namespace(),
			directories: default_directories(),
			default_category: default_category(),
			theme: ThemeConfig::default(),
			site: SiteConfig::default(),
			extensions: ExtensionsConfig::default(),
		}
	}
}

/// Theme roots, relative to the project root.
#[derive(Debug, Deserialize)]
pub struct ThemeConfig {
	/// The parent (base) theme root.
	#[serde(default = "default_theme_root")]
	pub template: PathBuf,
	/// An optional child theme root whose files override the parent theme.
	#[serde(default)]
	pub stylesheet: Option<PathBuf>,
}

impl Default for ThemeConfig {
	fn default() -> Self {
		Self {
			template: default_theme_root(),
			stylesheet: None,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
	/// Public base URL, e.g. `https://example.com`.
	#[serde(default = "default_site_url")]
	pub url: String,
	/// Filesystem directory published at `url`, relative to the project root.
	#[serde(default = "default_theme_root")]
	pub root: PathBuf,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			url: default_site_url(),
			root: default_theme_root(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct ExtensionsConfig {
	#[serde(default = "default_config_extension")]
	pub config: String,
	#[serde(default = "default_template_extension")]
	pub template: String,
	#[serde(default = "default_preview_extension")]
	pub preview: String,
}

impl Default for ExtensionsConfig {
	fn default() -> Self {
		Self {
			config: default_config_extension(),
			template: default_template_extension(),
			preview: default_preview_extension(),
		}
	}
}

fn default_namespace() -> String {
	DEFAULT_NAMESPACE.to_string()
}

fn default_directories() -> Vec<String> {
	vec![DEFAULT_BLOCK_DIRECTORY.to_string()]
}

fn default_category() -> String {
	DEFAULT_CATEGORY.to_string()
}

fn default_theme_root() -> PathBuf {
	PathBuf::from(".")
}

fn default_site_url() -> String {
	"http://localhost".to_string()
}

fn default_config_extension() -> String {
	"yml".to_string()
}

fn default_template_extension() -> String {
	"twig".to_string()
}

fn default_preview_extension() -> String {
	"jpg".to_string()
}

impl BlockyardConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> BlocksResult<Option<BlockyardConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: BlockyardConfig =
			toml::from_str(&content).map_err(|e| BlocksError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Resolve every relative path against `root`.
	pub fn into_settings(self, root: &Path) -> Settings {
		Settings {
			namespace: self.namespace,
			directories: self.directories,
			default_category: self.default_category,
			parent_theme: resolve_relative(root, &self.theme.template),
			child_theme: self
				.theme
				.stylesheet
				.map(|path| resolve_relative(root, &path)),
			site_url: self.site.url.trim_end_matches('/').to_string(),
			site_root: resolve_relative(root, &self.site.root),
			config_extension: self.extensions.config,
			template_extension: self.extensions.template,
			preview_extension: self.extensions.preview,
		}
	}
}

fn resolve_relative(root: &Path, path: &Path) -> PathBuf {
	if path == Path::new(".") {
		root.to_path_buf()
	} else {
		root.join(path)
	}
}

/// Resolved settings consumed by the library. Paths are absolute when the
/// project root was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub namespace: String,
	pub directories: Vec<String>,
	pub default_category: String,
	pub parent_theme: PathBuf,
	pub child_theme: Option<PathBuf>,
	pub site_url: String,
	pub site_root: PathBuf,
	pub config_extension: String,
	pub template_extension: String,
	pub preview_extension: String,
}

impl Settings {
	/// Settings for a single theme rooted at `root` with every other value
	/// at its default.
	pub fn for_theme(root: &Path) -> Self {
		BlockyardConfig::default().into_settings(root)
	}

	/// Load `blockyard.toml` from `root` (if any) and resolve it.
	pub fn load(root: &Path) -> BlocksResult<Self> {
		let config = BlockyardConfig::load(root)?.unwrap_or_default();
		Ok(config.into_settings(root))
	}
}
