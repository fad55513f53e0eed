use std::path::Path;
use std::path::PathBuf;

use crate::config::Settings;

/// Resolves logical theme paths (such as `views/blocks`) to locations on
/// disk.
pub trait ThemeLocator {
	/// Return the first existing location of `relative`, or `None` when no
	/// theme root contains it.
	fn locate(&self, relative: &str) -> Option<PathBuf>;

	/// Every location `relative` could live at, in lookup order, whether or
	/// not it exists.
	fn candidates(&self, relative: &str) -> Vec<PathBuf>;
}

/// A parent theme with an optional child theme layered on top.
///
/// The child theme is always consulted first so it can override any file
/// shipped by the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRoots {
	pub child: Option<PathBuf>,
	pub parent: PathBuf,
}

impl ThemeRoots {
	pub fn new(parent: impl Into<PathBuf>) -> Self {
		Self {
			child: None,
			parent: parent.into(),
		}
	}

	#[must_use]
	pub fn with_child(mut self, child: impl Into<PathBuf>) -> Self {
		self.child = Some(child.into());
		self
	}

	pub fn from_settings(settings: &Settings) -> Self {
		Self {
			child: settings.child_theme.clone(),
			parent: settings.parent_theme.clone(),
		}
	}

	fn roots(&self) -> impl Iterator<Item = &Path> {
		self.child
			.as_deref()
			.into_iter()
			.chain(std::iter::once(self.parent.as_path()))
	}
}

impl ThemeLocator for ThemeRoots {
	fn locate(&self, relative: &str) -> Option<PathBuf> {
		if relative.is_empty() {
			return None;
		}

		self.candidates(relative)
			.into_iter()
			.find(|path| path.exists())
	}

	fn candidates(&self, relative: &str) -> Vec<PathBuf> {
		let relative = relative.trim_start_matches('/');
		let mut candidates: Vec<PathBuf> = Vec::new();

		for root in self.roots() {
			let candidate = root.join(relative);
			if !candidates.contains(&candidate) {
				candidates.push(candidate);
			}
		}

		candidates
	}
}
