use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::BlocksResult;
use crate::blocks::Blocks;
use crate::descriptor::BlockDescriptor;
use crate::descriptor::INSERTER_PREVIEW_KEY;
use crate::engine::TemplateEngine;
use crate::fields::FieldSource;
use crate::gate::normalize_identifier;
use crate::hooks::DataFilterArgs;
use crate::hooks::HookName;
use crate::hooks::Hooks;

/// The function a host calls to render a registered block.
pub type RenderCallback = fn(
	&Blocks,
	&mut RenderSession<'_>,
	&BlockInstance,
	RenderArgs,
) -> BlocksResult<RenderedBlock>;

/// A block placed on a page, as handed to the render callback by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockInstance {
	/// The registered settings of the block, without `name`.
	#[serde(flatten)]
	pub settings: Map<String, Value>,
	/// The namespaced name, e.g. `acf/hero`.
	pub name: String,
	/// Per-instance block data supplied by the host.
	pub data: Map<String, Value>,
	/// Inner content. Always empty for blocks rendered from templates.
	pub content: String,
}

impl BlockInstance {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	/// An instance of `descriptor` registered under `namespace`.
	pub fn from_descriptor(namespace: &str, descriptor: &BlockDescriptor) -> Self {
		let mut settings = match descriptor.to_value() {
			Value::Object(settings) => settings,
			_ => Map::new(),
		};
		settings.remove("name");

		Self {
			settings,
			name: format!("{namespace}{}", descriptor.name),
			data: Map::new(),
			content: String::new(),
		}
	}

	#[must_use]
	pub fn with_data(mut self, data: Map<String, Value>) -> Self {
		self.data = data;
		self
	}

	/// The stylesheet handle this block asks to attach, if any.
	pub fn attach_style(&self) -> Option<String> {
		match self.settings.get("attach_style")? {
			Value::Null => None,
			Value::String(style) => Some(style.clone()),
			other => Some(other.to_string()),
		}
	}

	/// Inserter preview image data, either supplied with this instance or
	/// carried by the registered example.
	pub fn inserter_preview(&self) -> Option<&Value> {
		self.data.get(INSERTER_PREVIEW_KEY).or_else(|| {
			self.settings
				.get("example")?
				.get("attributes")?
				.get("data")?
				.get(INSERTER_PREVIEW_KEY)
		})
	}
}

/// Arguments that vary per render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderArgs {
	/// True while the editor renders a live preview.
	pub is_preview: bool,
}

impl RenderArgs {
	pub fn preview() -> Self {
		Self { is_preview: true }
	}
}

/// State for one request.
///
/// A session is created for every request and dropped when it finishes.
/// It remembers which blocks already attached their stylesheet, so the
/// marker is emitted once per block name per request.
pub struct RenderSession<'a> {
	fields: &'a dyn FieldSource,
	engine: &'a dyn TemplateEngine,
	inserter_preview_request: bool,
	rendered_styles: HashSet<String>,
}

impl<'a> RenderSession<'a> {
	pub fn new(fields: &'a dyn FieldSource, engine: &'a dyn TemplateEngine) -> Self {
		Self {
			fields,
			engine,
			inserter_preview_request: false,
			rendered_styles: HashSet::new(),
		}
	}

	/// Mark this request as an inserter preview query.
	#[must_use]
	pub fn with_inserter_preview(mut self, inserter_preview_request: bool) -> Self {
		self.inserter_preview_request = inserter_preview_request;
		self
	}

	/// Whether `name` has already attached its stylesheet in this session.
	pub fn has_rendered_style(&self, name: &str) -> bool {
		self.rendered_styles.contains(name)
	}
}

/// The context handed to the template engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
	/// The block instance being rendered.
	pub block: BlockInstance,
	/// The block name with the namespace prefix stripped.
	pub name: String,
	/// `name` with `-` replaced by `_`.
	pub normalized_name: String,
	pub is_preview: bool,
	/// Field data after all data filters ran.
	pub data: Value,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub preview_data: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inserter_preview: Option<Value>,
	/// Stylesheet handle to attach. Only set the first time a block renders
	/// in a session.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stylesheet: Option<String>,
}

/// Output of one render.
#[derive(Debug, Clone)]
pub struct RenderedBlock {
	pub html: String,
	pub context: RenderContext,
	/// Every template path that was offered to the engine, in lookup order.
	pub candidates: Vec<PathBuf>,
}

/// Render `instance` with the current field data.
///
/// This is the callback bound to every registered descriptor.
pub fn render_block(
	blocks: &Blocks,
	session: &mut RenderSession<'_>,
	instance: &BlockInstance,
	args: RenderArgs,
) -> BlocksResult<RenderedBlock> {
	let fields = session
		.fields
		.current_fields()
		.unwrap_or_else(|| json!({}));
	let name = instance
		.name
		.strip_prefix(blocks.settings().namespace.as_str())
		.unwrap_or(&instance.name)
		.to_string();
	let normalized_name = normalize_identifier(&name);
	let hooks = blocks.hooks();
	let filter_args = DataFilterArgs {
		block: instance,
		name: &name,
	};

	let mut preview_data = None;
	let mut inserter_preview = None;
	if args.is_preview {
		preview_data = Some(apply_data_chain(
			hooks,
			HookName::PreviewData,
			HookName::BlockPreviewData,
			json!({}),
			&filter_args,
			&normalized_name,
		));

		if session.inserter_preview_request {
			inserter_preview = instance.inserter_preview().cloned();
		}
	}

	let data = apply_data_chain(
		hooks,
		HookName::RenderData,
		HookName::BlockRenderData,
		fields,
		&filter_args,
		&normalized_name,
	);

	let stylesheet = match instance.attach_style() {
		Some(style) if session.rendered_styles.insert(instance.name.clone()) => Some(style),
		_ => None,
	};

	let context = RenderContext {
		block: instance.clone(),
		name,
		normalized_name,
		is_preview: args.is_preview,
		data,
		preview_data,
		inserter_preview,
		stylesheet,
	};

	let candidates = blocks.template_candidates(&context.name)?;
	tracing::debug!(
		block = %instance.name,
		candidates = candidates.len(),
		"rendering block"
	);
	let html = session.engine.render(&candidates, &context)?;

	Ok(RenderedBlock {
		html,
		context,
		candidates,
	})
}

/// Run the global filter, then the block filter keyed by the literal name
/// (when it differs from the normalized name), then the block filter keyed
/// by the normalized name.
fn apply_data_chain(
	hooks: &Hooks,
	global: HookName,
	per_block: fn(String) -> HookName,
	value: Value,
	args: &DataFilterArgs<'_>,
	normalized_name: &str,
) -> Value {
	let mut value = hooks.apply_data(&global, value, args);

	if args.name != normalized_name {
		let literal = per_block(args.name.to_string());
		if hooks.has(&literal) {
			tracing::warn!(
				hook = %literal,
				"hook names containing `-` are deprecated, use `{}` instead",
				per_block(normalized_name.to_string())
			);
		}
		value = hooks.apply_data(&literal, value, args);
	}

	hooks.apply_data(&per_block(normalized_name.to_string()), value, args)
}
