use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::BlocksError;
use crate::BlocksResult;
use crate::config::Settings;
use crate::render::RenderContext;

/// Produces markup for a block from a list of candidate template paths.
pub trait TemplateEngine {
	/// Render the first existing template in `candidates` with `context`.
	/// Fails with [`BlocksError::TemplateNotFound`] when none exists.
	fn render(&self, candidates: &[PathBuf], context: &RenderContext) -> BlocksResult<String>;
}

/// A [`TemplateEngine`] backed by minijinja.
///
/// Twig templates written for blocks use the common subset of Twig and
/// Jinja syntax, which minijinja renders directly.
#[derive(Debug, Clone, Default)]
pub struct JinjaEngine {
	globals: BTreeMap<String, serde_json::Value>,
}

impl JinjaEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// An engine exposing `site.url` to every template.
	pub fn from_settings(settings: &Settings) -> Self {
		Self::new().with_global("site", serde_json::json!({ "url": settings.site_url }))
	}

	/// Make `value` available to every template as `name`.
	#[must_use]
	pub fn with_global(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
		self.globals.insert(name.into(), value);
		self
	}
}

impl TemplateEngine for JinjaEngine {
	fn render(&self, candidates: &[PathBuf], context: &RenderContext) -> BlocksResult<String> {
		let Some(path) = candidates.iter().find(|path| path.is_file()) else {
			return Err(BlocksError::TemplateNotFound {
				name: context.name.clone(),
				searched: candidates
					.iter()
					.map(|path| path.display().to_string())
					.collect::<Vec<_>>()
					.join(", "),
			});
		};

		let source = std::fs::read_to_string(path)?;
		let template_name = path.display().to_string();
		render_template(&template_name, &source, &self.globals, context)
	}
}

/// Render `source` through minijinja with `globals` and `context`.
#[allow(clippy::implicit_hasher)]
pub fn render_template(
	name: &str,
	source: &str,
	globals: &BTreeMap<String, serde_json::Value>,
	context: &RenderContext,
) -> BlocksResult<String> {
	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.set_undefined_behavior(minijinja::UndefinedBehavior::Chainable);
	for (key, value) in globals {
		env.add_global(key.clone(), minijinja::Value::from_serialize(value));
	}
	env.add_template(name, source)
		.map_err(|e| BlocksError::TemplateRender(e.to_string()))?;

	let template = env
		.get_template(name)
		.map_err(|e| BlocksError::TemplateRender(e.to_string()))?;

	let ctx = minijinja::Value::from_serialize(context);
	template
		.render(ctx)
		.map_err(|e| BlocksError::TemplateRender(e.to_string()))
}
