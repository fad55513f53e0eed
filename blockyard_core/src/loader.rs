use std::path::Path;

use derive_more::Deref;
use derive_more::DerefMut;
use serde_json::Map;
use serde_json::Value;

use crate::BlocksError;
use crate::BlocksResult;

/// The parsed content of one block configuration file.
///
/// No shape is enforced here beyond "top level is a mapping". Validation of
/// individual keys happens in [`build_descriptor`](crate::build_descriptor).
#[derive(Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct RawBlockConfig(Map<String, Value>);

impl RawBlockConfig {
	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}
}

impl From<Map<String, Value>> for RawBlockConfig {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

/// Read and parse the block configuration at `path`.
///
/// A file that cannot be read (missing permissions, invalid UTF-8) is
/// reported as [`BlocksError::BlockParse`] so the error names the file.
pub fn load_block_config(path: &Path) -> BlocksResult<RawBlockConfig> {
	let content = std::fs::read_to_string(path).map_err(|e| {
		BlocksError::BlockParse {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;
	parse_block_config(&content, path)
}

/// Parse YAML block configuration `content`. `path` is only used for error
/// reporting.
pub fn parse_block_config(content: &str, path: &Path) -> BlocksResult<RawBlockConfig> {
	let parse_error = |reason: String| {
		BlocksError::BlockParse {
			path: path.display().to_string(),
			reason,
		}
	};

	let value: Value = serde_yaml_ng::from_str(content).map_err(|e| parse_error(e.to_string()))?;

	match value {
		// An empty document has no keys, which later reads as a missing title.
		Value::Null => Ok(RawBlockConfig::default()),
		Value::Object(map) => Ok(RawBlockConfig(map)),
		other => {
			Err(parse_error(format!(
				"expected a mapping at the top level, found {}",
				value_kind(&other)
			)))
		}
	}
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "a sequence",
		Value::Object(_) => "a mapping",
	}
}
