use minijinja::Environment;
use minijinja::context;

use crate::BlocksError;
use crate::BlocksResult;
use crate::registry::BlockHost;

/// Title of the dashboard page listing the available blocks.
pub const BLOCK_PAGE_TITLE: &str = "Available theme blocks";

const BLOCK_PAGE_TEMPLATE: &str = r#"<div class="wrap">
<h1>{{ title }}</h1>
{% if block_names %}<div>
<h2>These blocks are currently available:</h2>
<ul>
{% for name in block_names %}<li><code>{{ name }}</code></li>
{% endfor %}</ul>
</div>
{% endif %}</div>
"#;

/// Who is looking at the administrative surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer {
	/// The viewer may manage site options.
	pub can_manage_options: bool,
}

impl Viewer {
	pub fn admin() -> Self {
		Self {
			can_manage_options: true,
		}
	}
}

/// Registered block names under `namespace`, prefix stripped, sorted.
pub fn list_block_names(host: &dyn BlockHost, namespace: &str) -> Vec<String> {
	let mut names: Vec<String> = host
		.registered_names()
		.into_iter()
		.filter_map(|name| name.strip_prefix(namespace).map(ToString::to_string))
		.collect();
	names.sort();
	names
}

/// Render the page listing every block registered under `namespace`.
///
/// Returns `None` when `viewer` may not manage options.
pub fn render_block_page(
	host: &dyn BlockHost,
	namespace: &str,
	viewer: Viewer,
) -> BlocksResult<Option<String>> {
	if !viewer.can_manage_options {
		return Ok(None);
	}

	let block_names = list_block_names(host, namespace);
	let mut env = Environment::new();
	env.set_auto_escape_callback(|_| minijinja::AutoEscape::Html);
	env.add_template("block_page", BLOCK_PAGE_TEMPLATE)
		.map_err(|e| BlocksError::TemplateRender(e.to_string()))?;
	let template = env
		.get_template("block_page")
		.map_err(|e| BlocksError::TemplateRender(e.to_string()))?;

	template
		.render(context! {
			title => BLOCK_PAGE_TITLE,
			block_names => block_names,
		})
		.map(Some)
		.map_err(|e| BlocksError::TemplateRender(e.to_string()))
}
