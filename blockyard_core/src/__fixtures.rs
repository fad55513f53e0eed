use std::path::Path;

use serde_json::Value;
use tempfile::TempDir;

use crate::BlockDescriptor;
use crate::BlockHost;
use crate::BlockRegistry;
use crate::Blocks;
use crate::Hooks;
use crate::Settings;

pub fn theme_dir() -> TempDir {
	tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"))
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}

/// Write `views/blocks/<name>.yml` and `views/blocks/<name>.twig`.
pub fn write_block(root: &Path, name: &str, config: &str, template: &str) {
	write_file(root, &format!("views/blocks/{name}.yml"), config);
	write_file(root, &format!("views/blocks/{name}.twig"), template);
}

pub fn hero_theme() -> TempDir {
	let tmp = theme_dir();
	write_block(
		tmp.path(),
		"hero",
		"title: 'Hero'\n",
		"<section class=\"hero\">{{ name }}</section>",
	);
	tmp
}

pub fn blocks_for(root: &Path, hooks: Hooks) -> Blocks {
	Blocks::new(Settings::for_theme(root), hooks)
}

/// Register every block under `root` into a fresh registry.
pub fn registered(blocks: &mut Blocks) -> BlockRegistry {
	let mut registry = BlockRegistry::new(blocks.settings().namespace.clone());
	blocks.register_blocks(&mut registry);
	registry
}

/// A [`BlockHost`] that records every descriptor in order, duplicates
/// included.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
	pub descriptors: Vec<BlockDescriptor>,
}

impl RecordingHost {
	pub fn names(&self) -> Vec<String> {
		self.descriptors
			.iter()
			.map(|descriptor| descriptor.name.clone())
			.collect()
	}

	pub fn values(&self) -> Vec<Value> {
		self.descriptors.iter().map(BlockDescriptor::to_value).collect()
	}
}

impl BlockHost for RecordingHost {
	fn register_block_type(&mut self, descriptor: BlockDescriptor) {
		self.descriptors.push(descriptor);
	}

	fn registered_names(&self) -> Vec<String> {
		self.names()
			.into_iter()
			.map(|name| format!("acf/{name}"))
			.collect()
	}
}
