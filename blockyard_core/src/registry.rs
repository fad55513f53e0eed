use std::collections::BTreeMap;

use serde::Serialize;

use crate::BlocksError;
use crate::BlocksResult;
use crate::blocks::Blocks;
use crate::descriptor::BlockDescriptor;
use crate::render::BlockInstance;
use crate::render::RenderArgs;
use crate::render::RenderSession;
use crate::render::RenderedBlock;

/// The host block-editor framework, as seen by this layer.
pub trait BlockHost {
	/// Register a block type. The host takes ownership of the descriptor.
	fn register_block_type(&mut self, descriptor: BlockDescriptor);

	/// Names of every registered block type, namespaced, in any order.
	fn registered_names(&self) -> Vec<String>;
}

/// Hand `descriptor` to the host. Host-side failures are not surfaced.
pub fn register_descriptor(host: &mut dyn BlockHost, descriptor: BlockDescriptor) {
	tracing::info!(name = %descriptor.name, category = %descriptor.category, "registering block");
	host.register_block_type(descriptor);
}

/// An in-memory [`BlockHost`].
///
/// Blocks are keyed by their namespaced name. Registering a name twice
/// replaces the earlier descriptor.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
	namespace: String,
	blocks: BTreeMap<String, BlockDescriptor>,
}

impl BlockRegistry {
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			blocks: BTreeMap::new(),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Look up a block by its namespaced name, e.g. `acf/hero`.
	pub fn get(&self, name: &str) -> Option<&BlockDescriptor> {
		self.blocks.get(name)
	}

	pub fn descriptors(&self) -> impl Iterator<Item = &BlockDescriptor> {
		self.blocks.values()
	}

	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	/// A fresh instance of the block registered as `name`.
	pub fn instance(&self, name: &str) -> Option<BlockInstance> {
		self.get(name)
			.map(|descriptor| BlockInstance::from_descriptor(&self.namespace, descriptor))
	}

	/// Render `instance` through the callback stored with its descriptor.
	pub fn render(
		&self,
		blocks: &Blocks,
		session: &mut RenderSession<'_>,
		instance: &BlockInstance,
		args: RenderArgs,
	) -> BlocksResult<RenderedBlock> {
		let descriptor = self
			.get(&instance.name)
			.ok_or_else(|| BlocksError::UnknownBlock(instance.name.clone()))?;
		(descriptor.render_callback)(blocks, session, instance, args)
	}
}

impl BlockHost for BlockRegistry {
	fn register_block_type(&mut self, descriptor: BlockDescriptor) {
		let key = format!("{}{}", self.namespace, descriptor.name);
		if self.blocks.insert(key, descriptor).is_some() {
			tracing::debug!("replaced an existing block registration");
		}
	}

	fn registered_names(&self) -> Vec<String> {
		self.blocks.keys().cloned().collect()
	}
}

/// An entry in the block inserter's category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockCategory {
	pub slug: String,
	pub title: String,
}

/// Append the `theme` category that blocks default to.
pub fn block_categories(mut categories: Vec<BlockCategory>) -> Vec<BlockCategory> {
	categories.push(BlockCategory {
		slug: crate::config::DEFAULT_CATEGORY.to_string(),
		title: "Theme".to_string(),
	});
	categories
}
