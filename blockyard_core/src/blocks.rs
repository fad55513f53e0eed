use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::BlocksError;
use crate::BlocksResult;
use crate::config::Settings;
use crate::descriptor::BlockSource;
use crate::descriptor::build_descriptor;
use crate::gate::should_register;
use crate::hooks::Hooks;
use crate::loader::load_block_config;
use crate::loader::value_kind;
use crate::notices::Notices;
use crate::registry::BlockHost;
use crate::registry::register_descriptor;
use crate::scanner::scan_directories;
use crate::theme::ThemeLocator;
use crate::theme::ThemeRoots;

/// What the host environment provides. Registration only starts when every
/// capability is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
	/// The host exposes a block type registration entry point.
	pub block_registration: bool,
	/// The companion core functionality layer is loaded.
	pub core_functionality: bool,
}

impl HostCapabilities {
	pub fn all() -> Self {
		Self {
			block_registration: true,
			core_functionality: true,
		}
	}
}

/// Summary of one registration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationReport {
	/// Names of the blocks handed to the host, in registration order.
	pub registered: Vec<String>,
	/// Names of the blocks a registration hook vetoed.
	pub vetoed: Vec<String>,
	/// `directory/file` of every configuration that could not be used.
	pub failed: Vec<String>,
	/// True when the directory list was unusable and nothing was scanned.
	pub aborted: bool,
}

/// The application context shared by registration and rendering.
///
/// One instance is built per process. It owns the settings, the hook
/// registry, the theme locator and the notice queue. Per-request render
/// state lives in [`RenderSession`](crate::RenderSession) instead.
pub struct Blocks {
	settings: Settings,
	hooks: Hooks,
	locator: Box<dyn ThemeLocator + Send + Sync>,
	notices: Notices,
}

impl fmt::Debug for Blocks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Blocks")
			.field("settings", &self.settings)
			.field("hooks", &self.hooks)
			.field("notices", &self.notices)
			.finish_non_exhaustive()
	}
}

impl Blocks {
	/// Build the context using the theme roots from `settings`.
	pub fn new(settings: Settings, hooks: Hooks) -> Self {
		let locator = ThemeRoots::from_settings(&settings);
		Self::with_locator(settings, hooks, locator)
	}

	pub fn with_locator(
		settings: Settings,
		hooks: Hooks,
		locator: impl ThemeLocator + Send + Sync + 'static,
	) -> Self {
		Self {
			settings,
			hooks,
			locator: Box::new(locator),
			notices: Notices::new(),
		}
	}

	/// Check `capabilities` and build the context.
	///
	/// When a capability is missing an error notice is queued on `notices`
	/// and [`BlocksError::MissingDependency`] is returned; the caller should
	/// leave the layer disabled.
	pub fn bootstrap(
		settings: Settings,
		hooks: Hooks,
		capabilities: HostCapabilities,
		notices: &mut Notices,
	) -> BlocksResult<Self> {
		check_dependencies(capabilities, notices)?;
		Ok(Self::new(settings, hooks))
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn hooks(&self) -> &Hooks {
		&self.hooks
	}

	pub fn hooks_mut(&mut self) -> &mut Hooks {
		&mut self.hooks
	}

	pub fn notices(&self) -> &Notices {
		&self.notices
	}

	/// Remove and return every queued notice.
	pub fn take_notices(&mut self) -> Notices {
		std::mem::take(&mut self.notices)
	}

	/// The configured directories after the directories hook ran.
	pub fn directories(&self) -> BlocksResult<Vec<String>> {
		let seed = Value::Array(
			self.settings
				.directories
				.iter()
				.cloned()
				.map(Value::String)
				.collect(),
		);

		match self.hooks.apply_directories(seed) {
			Value::Array(items) => {
				items
					.into_iter()
					.map(|item| {
						match item {
							Value::String(directory) => Ok(directory),
							other => {
								Err(BlocksError::InvalidDirectoryList(format!(
									"a list containing {}",
									value_kind(&other)
								)))
							}
						}
					})
					.collect()
			}
			other => Err(BlocksError::InvalidDirectoryList(value_kind(&other).to_string())),
		}
	}

	/// Every path the template for block `name` may live at, child theme
	/// before parent theme, for each scanned directory in order.
	pub fn template_candidates(&self, name: &str) -> BlocksResult<Vec<PathBuf>> {
		let file_name = format!("{name}.{}", self.settings.template_extension);
		let mut candidates: Vec<PathBuf> = Vec::new();

		for directory in self.directories()? {
			let relative = format!("{}/{file_name}", directory.trim_end_matches('/'));
			for candidate in self.locator.candidates(&relative) {
				if !candidates.contains(&candidate) {
					candidates.push(candidate);
				}
			}
		}

		Ok(candidates)
	}

	/// Discover every block configuration and register it with `host`.
	///
	/// Problems are queued as notices and never abort the whole pass, with
	/// two exceptions kept for compatibility: a directory that does not
	/// resolve or cannot be listed stops the scan of every later directory,
	/// and a configuration without a title stops the scan of the rest of its
	/// directory.
	pub fn register_blocks(&mut self, host: &mut dyn BlockHost) -> RegistrationReport {
		let mut report = RegistrationReport::default();

		let directories = match self.directories() {
			Ok(directories) => directories,
			Err(error) => {
				self.notices.error_for(&error);
				report.aborted = true;
				return report;
			}
		};

		let scanned = scan_directories(
			self.locator.as_ref(),
			&directories,
			&self.settings.config_extension,
			&mut self.notices,
		);

		for directory in &scanned {
			for file in &directory.files {
				let file_name = file
					.file_name()
					.map(|name| name.to_string_lossy().into_owned())
					.unwrap_or_default();
				let file_stem = file
					.file_stem()
					.map(|stem| stem.to_string_lossy().into_owned())
					.unwrap_or_default();
				let display = format!("{}/{file_name}", directory.id);

				let raw = match load_block_config(file) {
					Ok(raw) => raw,
					Err(BlocksError::BlockParse { reason, .. }) => {
						self.notices.error_for(&BlocksError::BlockParse {
							path: display.clone(),
							reason,
						});
						report.failed.push(display);
						continue;
					}
					Err(error) => {
						self.notices.error_for(&error);
						report.failed.push(display);
						continue;
					}
				};

				let source = BlockSource {
					directory: &directory.id,
					resolved: &directory.path,
					file_name: &file_name,
					file_stem: &file_stem,
				};

				let descriptor =
					match build_descriptor(raw, &source, &self.settings, &mut self.notices) {
						Ok(descriptor) => descriptor,
						Err(error @ BlocksError::MissingTitle { .. }) => {
							self.notices.error_for(&error);
							report.failed.push(display);
							tracing::warn!(
								directory = %directory.id,
								"missing title, skipping the remaining files in this directory"
							);
							break;
						}
						Err(error) => {
							self.notices.error_for(&error);
							report.failed.push(display);
							continue;
						}
					};

				if !should_register(&self.hooks, &descriptor.name) {
					report.vetoed.push(descriptor.name);
					continue;
				}

				report.registered.push(descriptor.name.clone());
				register_descriptor(host, descriptor);
			}
		}

		report
	}
}

/// Verify the host provides everything registration needs. The first
/// missing capability queues an error notice.
pub fn check_dependencies(
	capabilities: HostCapabilities,
	notices: &mut Notices,
) -> BlocksResult<()> {
	let missing = if !capabilities.block_registration {
		Some("a block type registration entry point")
	} else if !capabilities.core_functionality {
		Some("the core functionality layer")
	} else {
		None
	};

	match missing {
		Some(capability) => {
			let error = BlocksError::MissingDependency(capability.to_string());
			notices.error_for(&error);
			Err(error)
		}
		None => Ok(()),
	}
}
