//! Operator-facing notices.
//!
//! Problems found while discovering blocks are never fatal. They are queued
//! here and rendered later, when the administrative surface asks for them.

use std::fmt;

use minijinja::Environment;
use minijinja::HtmlEscape;
use minijinja::context;
use serde::Serialize;

use crate::BlocksError;
use crate::BlocksResult;

/// Notice title used for problems with a block configuration file.
pub const CONFIG_NOTICE_TITLE: &str = "Theme: block configuration";
/// Notice title used for problems with a block template.
pub const TEMPLATE_NOTICE_TITLE: &str = "Theme: block template";
/// Notice title used when the layer cannot start.
pub const DEPENDENCY_NOTICE_TITLE: &str = "ERROR: blocks cannot be initialized.";

/// Formatting tags allowed to pass through notice messages unescaped.
const ALLOWED_TAGS: [&str; 7] = ["strong", "em", "b", "i", "code", "br", "p"];

const NOTICE_TEMPLATE: &str = r#"<div class="notice notice-{{ severity }}">
{%- if title %}<p><strong>{{ title }}</strong></p>{% endif -%}
<p>{{ message }}</p></div>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Error,
	Warning,
	Info,
	Success,
}

impl Severity {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Error => "error",
			Self::Warning => "warning",
			Self::Info => "info",
			Self::Success => "success",
		}
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single queued notice. `message` may contain allowlisted formatting
/// markup; `title` is plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
	pub severity: Severity,
	pub title: Option<String>,
	pub message: String,
}

impl Notice {
	/// The message with every tag outside the allowlist escaped.
	pub fn sanitized_message(&self) -> String {
		sanitize_markup(&self.message)
	}

	/// The message with all markup removed, for terminals and logs.
	pub fn plain_message(&self) -> String {
		strip_markup(&self.message)
	}
}

/// Queue of notices waiting to be displayed.
#[derive(Debug, Clone, Default)]
pub struct Notices {
	queue: Vec<Notice>,
}

impl Notices {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue a notice for display. Nothing is rendered until
	/// [`Notices::render_admin_notices`] is called.
	pub fn report(&mut self, message: impl Into<String>, title: Option<&str>, severity: Severity) {
		let notice = Notice {
			severity,
			title: title.map(ToString::to_string),
			message: message.into(),
		};

		let plain = notice.plain_message();
		match severity {
			Severity::Error => tracing::error!(title = ?notice.title, "{plain}"),
			Severity::Warning => tracing::warn!(title = ?notice.title, "{plain}"),
			Severity::Info | Severity::Success => tracing::info!(title = ?notice.title, "{plain}"),
		}

		self.queue.push(notice);
	}

	pub fn error(&mut self, message: impl Into<String>, title: Option<&str>) {
		self.report(message, title, Severity::Error);
	}

	pub fn warning(&mut self, message: impl Into<String>, title: Option<&str>) {
		self.report(message, title, Severity::Warning);
	}

	pub fn success(&mut self, message: impl Into<String>, title: Option<&str>) {
		self.report(message, title, Severity::Success);
	}

	/// Queue `error` as an error notice with a message suited to the admin
	/// surface.
	pub fn error_for(&mut self, error: &BlocksError) {
		let (title, message) = describe(error);
		self.error(message, title);
	}

	/// Queue `error` as a warning notice.
	pub fn warning_for(&mut self, error: &BlocksError) {
		let (title, message) = describe(error);
		self.warning(message, title);
	}

	pub fn iter(&self) -> impl Iterator<Item = &Notice> {
		self.queue.iter()
	}

	pub fn len(&self) -> usize {
		self.queue.len()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}

	pub fn has_errors(&self) -> bool {
		self.queue
			.iter()
			.any(|notice| notice.severity == Severity::Error)
	}

	/// Remove and return every queued notice.
	pub fn drain(&mut self) -> Vec<Notice> {
		std::mem::take(&mut self.queue)
	}

	/// Render every queued notice as admin markup, in queue order.
	pub fn render_admin_notices(&self) -> BlocksResult<String> {
		let mut env = Environment::new();
		env.set_auto_escape_callback(|_| minijinja::AutoEscape::Html);
		env.add_template("notice", NOTICE_TEMPLATE)
			.map_err(|e| BlocksError::TemplateRender(e.to_string()))?;
		let template = env
			.get_template("notice")
			.map_err(|e| BlocksError::TemplateRender(e.to_string()))?;

		let mut output = String::new();
		for notice in &self.queue {
			let rendered = template
				.render(context! {
					severity => notice.severity.as_str(),
					title => notice.title.as_deref(),
					message => minijinja::Value::from_safe_string(notice.sanitized_message()),
				})
				.map_err(|e| BlocksError::TemplateRender(e.to_string()))?;
			output.push_str(&rendered);
			output.push('\n');
		}

		Ok(output)
	}
}

/// Title and markup message for an error shown on the admin surface.
fn describe(error: &BlocksError) -> (Option<&'static str>, String) {
	match error {
		BlocksError::MissingTitle { directory, file } => {
			(
				Some(CONFIG_NOTICE_TITLE),
				format!(
					"The block configuration <strong>{directory}/{file}</strong> is missing a title \
					 (<code>title</code>)."
				),
			)
		}
		BlocksError::BlockParse { path, reason } => {
			(
				Some(CONFIG_NOTICE_TITLE),
				format!("Failed to parse <strong>{path}</strong>:<br><code>{reason}</code>"),
			)
		}
		BlocksError::DirectoryRead { directory, reason } => {
			(
				Some(CONFIG_NOTICE_TITLE),
				format!(
					"The block directory <strong>{directory}</strong> could not be \
					 read:<br><code>{reason}</code>"
				),
			)
		}
		BlocksError::InvalidField {
			file,
			field,
			reason,
		} => {
			(
				Some(CONFIG_NOTICE_TITLE),
				format!("Invalid <code>{field}</code> in <strong>{file}</strong>: {reason}"),
			)
		}
		BlocksError::MissingTemplate { directory, file } => {
			(
				Some(TEMPLATE_NOTICE_TITLE),
				format!("The block template <strong>{directory}/{file}</strong> is missing."),
			)
		}
		BlocksError::InvalidDirectoryList(found) => {
			(
				None,
				format!(
					"The <code>blockyard/directories</code> hook must return a list of strings, got \
					 {found}."
				),
			)
		}
		BlocksError::MissingDependency(capability) => {
			(
				Some(DEPENDENCY_NOTICE_TITLE),
				format!("Blockyard requires {capability}, which is not available."),
			)
		}
		other => (None, other.to_string()),
	}
}

/// Escape `text` for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
	HtmlEscape(text).to_string()
}

/// Escape everything in `message` except bare allowlisted formatting tags
/// such as `<strong>`, `</code>` or `<br />`. Tags carrying attributes are
/// escaped too.
pub fn sanitize_markup(message: &str) -> String {
	let mut output = String::with_capacity(message.len());
	let mut rest = message;

	while let Some(start) = rest.find('<') {
		output.push_str(&escape_html(&rest[..start]));
		let candidate = &rest[start..];

		match candidate.find('>').map(|end| &candidate[..=end]) {
			Some(tag) if allowed_tag(tag).is_some() => {
				output.push_str(tag);
				rest = &candidate[tag.len()..];
			}
			_ => {
				output.push_str("&lt;");
				rest = &candidate[1..];
			}
		}
	}

	output.push_str(&escape_html(rest));
	output
}

/// Remove allowlisted tags from `message`, leaving the text between them.
pub fn strip_markup(message: &str) -> String {
	let mut output = String::with_capacity(message.len());
	let mut rest = message;

	while let Some(start) = rest.find('<') {
		output.push_str(&rest[..start]);
		let candidate = &rest[start..];

		match candidate.find('>').map(|end| &candidate[..=end]) {
			Some(tag) if allowed_tag(tag).is_some() => {
				if allowed_tag(tag) == Some("br") {
					output.push(' ');
				}
				rest = &candidate[tag.len()..];
			}
			_ => {
				output.push('<');
				rest = &candidate[1..];
			}
		}
	}

	output.push_str(rest);
	output
}

/// Returns the tag name when `tag` (including its angle brackets) is an
/// attribute-free allowlisted opening, closing or self-closing tag.
fn allowed_tag(tag: &str) -> Option<&'static str> {
	let inner = tag.strip_prefix('<')?.strip_suffix('>')?;
	let inner = inner.strip_prefix('/').unwrap_or(inner);
	let inner = inner.strip_suffix('/').unwrap_or(inner).trim_end();

	ALLOWED_TAGS
		.iter()
		.copied()
		.find(|allowed| inner.eq_ignore_ascii_case(allowed))
}
