//! Typed extension points.
//!
//! Every hook has a fixed signature and a [`HookName`] that identifies it.
//! Hooks that target a single block are keyed by the block's name, so
//! `HookName::RegisterBlock("hero_banner".into())` only ever sees the veto
//! decision for `hero_banner`.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::render::BlockInstance;

/// Filters the list of directories scanned for block configurations. The
/// value is untyped so that a misbehaving filter can be detected and
/// reported rather than silently coerced.
pub type DirectoriesFilter = Box<dyn Fn(Value) -> Value + Send + Sync>;

/// Filters field or preview data before it reaches the template engine.
pub type DataFilter = Box<dyn Fn(Value, &DataFilterArgs<'_>) -> Value + Send + Sync>;

/// Decides whether a block may be registered. Receives the decision so far.
pub type RegisterFilter = Box<dyn Fn(bool) -> bool + Send + Sync>;

/// Arguments passed to every [`DataFilter`] alongside the data itself.
#[derive(Debug, Clone, Copy)]
pub struct DataFilterArgs<'a> {
	/// The block instance being rendered.
	pub block: &'a BlockInstance,
	/// The display name of the block (namespace prefix stripped).
	pub name: &'a str,
}

/// The name of an extension point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HookName {
	/// `blockyard/directories`
	Directories,
	/// `blockyard/render_block/data`
	RenderData,
	/// `blockyard/render_block/data/<name>`
	BlockRenderData(String),
	/// `blockyard/render_block/preview_data`
	PreviewData,
	/// `blockyard/render_block/preview_data/<name>`
	BlockPreviewData(String),
	/// `blockyard/register_block/<name>`
	RegisterBlock(String),
}

impl fmt::Display for HookName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Directories => write!(f, "blockyard/directories"),
			Self::RenderData => write!(f, "blockyard/render_block/data"),
			Self::BlockRenderData(name) => write!(f, "blockyard/render_block/data/{name}"),
			Self::PreviewData => write!(f, "blockyard/render_block/preview_data"),
			Self::BlockPreviewData(name) => {
				write!(f, "blockyard/render_block/preview_data/{name}")
			}
			Self::RegisterBlock(name) => write!(f, "blockyard/register_block/{name}"),
		}
	}
}

/// Ordered handler lists keyed by hook name.
struct FilterChains<F> {
	chains: HashMap<HookName, Vec<F>>,
}

impl<F> Default for FilterChains<F> {
	fn default() -> Self {
		Self {
			chains: HashMap::new(),
		}
	}
}

impl<F> FilterChains<F> {
	fn add(&mut self, name: HookName, filter: F) {
		self.chains.entry(name).or_default().push(filter);
	}

	fn get(&self, name: &HookName) -> &[F] {
		self.chains.get(name).map(Vec::as_slice).unwrap_or(&[])
	}

	fn count(&self) -> usize {
		self.chains.values().map(Vec::len).sum()
	}
}

/// The registry of all extension points. Filters run in the order they were
/// added.
#[derive(Default)]
pub struct Hooks {
	directories: Vec<DirectoriesFilter>,
	data: FilterChains<DataFilter>,
	register: FilterChains<RegisterFilter>,
}

impl fmt::Debug for Hooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hooks")
			.field("directories", &self.directories.len())
			.field("data", &self.data.count())
			.field("register", &self.register.count())
			.finish()
	}
}

impl Hooks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Filter the list of scanned directories.
	pub fn on_directories(&mut self, filter: impl Fn(Value) -> Value + Send + Sync + 'static) {
		self.directories.push(Box::new(filter));
	}

	/// Filter field data for every block.
	pub fn on_render_data(
		&mut self,
		filter: impl Fn(Value, &DataFilterArgs<'_>) -> Value + Send + Sync + 'static,
	) {
		self.data.add(HookName::RenderData, Box::new(filter));
	}

	/// Filter field data for the block called `name`.
	pub fn on_block_render_data(
		&mut self,
		name: impl Into<String>,
		filter: impl Fn(Value, &DataFilterArgs<'_>) -> Value + Send + Sync + 'static,
	) {
		self.data
			.add(HookName::BlockRenderData(name.into()), Box::new(filter));
	}

	/// Filter preview data for every block.
	pub fn on_preview_data(
		&mut self,
		filter: impl Fn(Value, &DataFilterArgs<'_>) -> Value + Send + Sync + 'static,
	) {
		self.data.add(HookName::PreviewData, Box::new(filter));
	}

	/// Filter preview data for the block called `name`.
	pub fn on_block_preview_data(
		&mut self,
		name: impl Into<String>,
		filter: impl Fn(Value, &DataFilterArgs<'_>) -> Value + Send + Sync + 'static,
	) {
		self.data
			.add(HookName::BlockPreviewData(name.into()), Box::new(filter));
	}

	/// Veto (or re-allow) registration of the block called `name`.
	pub fn on_register_block(
		&mut self,
		name: impl Into<String>,
		filter: impl Fn(bool) -> bool + Send + Sync + 'static,
	) {
		self.register
			.add(HookName::RegisterBlock(name.into()), Box::new(filter));
	}

	/// Whether any filter is attached to `name`.
	pub fn has(&self, name: &HookName) -> bool {
		match name {
			HookName::Directories => !self.directories.is_empty(),
			HookName::RegisterBlock(_) => !self.register.get(name).is_empty(),
			_ => !self.data.get(name).is_empty(),
		}
	}

	pub fn apply_directories(&self, directories: Value) -> Value {
		self.directories
			.iter()
			.fold(directories, |value, filter| filter(value))
	}

	/// Run every data filter registered under `name`. Non-data hook names
	/// return `value` unchanged.
	pub fn apply_data(&self, name: &HookName, value: Value, args: &DataFilterArgs<'_>) -> Value {
		self.data
			.get(name)
			.iter()
			.fold(value, |value, filter| filter(value, args))
	}

	/// Run the registration veto chain for `name`, seeded with `allow`.
	pub fn apply_register(&self, name: &str, allow: bool) -> bool {
		self.register
			.get(&HookName::RegisterBlock(name.to_string()))
			.iter()
			.fold(allow, |allow, filter| filter(allow))
	}
}
