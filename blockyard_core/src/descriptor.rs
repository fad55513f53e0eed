use std::path::Path;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::BlocksError;
use crate::BlocksResult;
use crate::config::Settings;
use crate::loader::RawBlockConfig;
use crate::loader::value_kind;
use crate::notices::Notices;
use crate::render::RenderCallback;
use crate::render::render_block;

/// Key inside `example.attributes.data` that carries the inserter preview
/// image URL.
pub const INSERTER_PREVIEW_KEY: &str = "inserter_preview";

/// Where a block configuration was found.
#[derive(Debug, Clone, Copy)]
pub struct BlockSource<'a> {
	/// The logical directory, e.g. `views/blocks`.
	pub directory: &'a str,
	/// The directory on disk the logical directory resolved to.
	pub resolved: &'a Path,
	/// The configuration file name, e.g. `hero.yml`.
	pub file_name: &'a str,
	/// The configuration file name without its extension, e.g. `hero`.
	pub file_stem: &'a str,
}

/// A normalized, registration-ready block.
///
/// Keys this layer understands are typed; every other key from the
/// configuration file is kept in `extra` and handed to the host untouched.
#[derive(Debug, Clone, Serialize)]
pub struct BlockDescriptor {
	pub name: String,
	pub title: String,
	pub category: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mode: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub align: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub attach_style: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub keywords: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub supports: Option<Map<String, Value>>,
	/// A dashicon slug, an SVG string or a mapping such as
	/// `{ src, background, foreground }`, passed through as written.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub icon: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub example: Option<Value>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
	/// The function the host calls to render this block. Identical for every
	/// descriptor.
	#[serde(skip)]
	pub render_callback: RenderCallback,
}

impl PartialEq for BlockDescriptor {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
			&& self.title == other.title
			&& self.category == other.category
			&& self.mode == other.mode
			&& self.align == other.align
			&& self.attach_style == other.attach_style
			&& self.keywords == other.keywords
			&& self.supports == other.supports
			&& self.icon == other.icon
			&& self.example == other.example
			&& self.extra == other.extra
	}
}

impl BlockDescriptor {
	/// The inserter preview image URL, if a preview image was found.
	pub fn inserter_preview(&self) -> Option<&str> {
		self.example
			.as_ref()?
			.get("attributes")?
			.get("data")?
			.get(INSERTER_PREVIEW_KEY)?
			.as_str()
	}

	/// The descriptor as the JSON mapping the host receives.
	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
	}
}

/// Turn one parsed configuration into a [`BlockDescriptor`].
///
/// A missing or empty `title` fails with [`BlocksError::MissingTitle`].
/// A recognized key with the wrong shape fails with
/// [`BlocksError::InvalidField`]. A missing sibling template only queues a
/// warning notice.
pub fn build_descriptor(
	raw: RawBlockConfig,
	source: &BlockSource<'_>,
	settings: &Settings,
	notices: &mut Notices,
) -> BlocksResult<BlockDescriptor> {
	let mut map = raw.into_inner();

	let title = match map.remove("title") {
		Some(value) if !is_empty_value(&value) => scalar_string(source, "title", value)?,
		_ => {
			return Err(BlocksError::MissingTitle {
				directory: source.directory.to_string(),
				file: source.file_name.to_string(),
			});
		}
	};

	let category = match map.remove("category") {
		Some(value) if !is_empty_value(&value) => scalar_string(source, "category", value)?,
		_ => settings.default_category.clone(),
	};

	let mode = optional_string(source, &mut map, "mode")?;
	let align = optional_string(source, &mut map, "align")?;
	let attach_style = optional_string(source, &mut map, "attach_style")?;
	let icon = map.remove("icon").filter(|value| !value.is_null());
	let keywords = keywords(source, &mut map)?;
	let supports = match map.remove("supports") {
		None | Some(Value::Null) => None,
		Some(Value::Object(supports)) => Some(supports),
		Some(other) => return Err(invalid_field(source, "supports", "a mapping", &other)),
	};
	let mut example = match map.remove("example") {
		None | Some(Value::Null) => None,
		Some(value @ Value::Object(_)) => Some(value),
		Some(other) => return Err(invalid_field(source, "example", "a mapping", &other)),
	};

	// The host owns these keys.
	map.remove("name");
	map.remove("render_callback");

	let image = source
		.resolved
		.join(format!("{}.{}", source.file_stem, settings.preview_extension));
	if image.is_file() {
		match public_url(&image, &settings.site_root, &settings.site_url) {
			Some(url) => attach_inserter_preview(&mut example, url),
			None => {
				tracing::debug!(
					image = %image.display(),
					site_root = %settings.site_root.display(),
					"preview image lies outside the site root, skipping"
				);
			}
		}
	}

	let template_name = format!("{}.{}", source.file_stem, settings.template_extension);
	if !source.resolved.join(&template_name).is_file() {
		notices.warning_for(&BlocksError::MissingTemplate {
			directory: source.directory.to_string(),
			file: template_name,
		});
	}

	let descriptor = BlockDescriptor {
		name: source.file_stem.to_string(),
		title,
		category,
		mode,
		align,
		attach_style,
		keywords,
		supports,
		icon,
		example,
		extra: map,
		render_callback: render_block,
	};
	tracing::debug!(name = %descriptor.name, title = %descriptor.title, "built block descriptor");

	Ok(descriptor)
}

/// Rewrite a filesystem path below `site_root` into a URL below `site_url`.
pub fn public_url(path: &Path, site_root: &Path, site_url: &str) -> Option<String> {
	let relative = path.strip_prefix(site_root).ok()?;
	let segments: Vec<String> = relative
		.components()
		.map(|component| component.as_os_str().to_string_lossy().into_owned())
		.collect();

	if segments.is_empty() {
		return None;
	}

	Some(format!(
		"{}/{}",
		site_url.trim_end_matches('/'),
		segments.join("/")
	))
}

fn attach_inserter_preview(example: &mut Option<Value>, url: String) {
	let example = example.get_or_insert_with(|| json!({}));
	let Some(example) = example.as_object_mut() else {
		return;
	};

	let attributes = example
		.entry("attributes")
		.or_insert_with(|| json!({}));
	if !attributes.is_object() {
		*attributes = json!({});
	}
	let Some(attributes) = attributes.as_object_mut() else {
		return;
	};

	attributes.insert("mode".to_string(), Value::String("preview".to_string()));
	let data = attributes.entry("data").or_insert_with(|| json!({}));
	if !data.is_object() {
		*data = json!({});
	}
	if let Some(data) = data.as_object_mut() {
		data.insert(INSERTER_PREVIEW_KEY.to_string(), Value::String(url));
	}
}

/// Whether `value` counts as empty: null, `false`, `""`, `"0"`, `0` or an
/// empty sequence or mapping.
pub fn is_empty_value(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
		Value::String(s) => s.is_empty() || s == "0",
		Value::Array(a) => a.is_empty(),
		Value::Object(o) => o.is_empty(),
	}
}

fn scalar_string(source: &BlockSource<'_>, field: &str, value: Value) -> BlocksResult<String> {
	match value {
		Value::String(s) => Ok(s),
		Value::Number(n) => Ok(n.to_string()),
		other => Err(invalid_field(source, field, "a string", &other)),
	}
}

fn optional_string(
	source: &BlockSource<'_>,
	map: &mut Map<String, Value>,
	field: &str,
) -> BlocksResult<Option<String>> {
	match map.remove(field) {
		None | Some(Value::Null) => Ok(None),
		Some(value) => scalar_string(source, field, value).map(Some),
	}
}

fn keywords(
	source: &BlockSource<'_>,
	map: &mut Map<String, Value>,
) -> BlocksResult<Option<Vec<String>>> {
	match map.remove("keywords") {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(keyword)) => Ok(Some(vec![keyword])),
		Some(Value::Array(items)) => {
			items
				.into_iter()
				.map(|item| scalar_string(source, "keywords", item))
				.collect::<BlocksResult<Vec<_>>>()
				.map(Some)
		}
		Some(other) => Err(invalid_field(source, "keywords", "a sequence of strings", &other)),
	}
}

fn invalid_field(source: &BlockSource<'_>, field: &str, expected: &str, found: &Value) -> BlocksError {
	BlocksError::InvalidField {
		file: format!("{}/{}", source.directory, source.file_name),
		field: field.to_string(),
		reason: format!("expected {expected}, found {}", value_kind(found)),
	}
}
