use serde_json::Value;

/// Supplies the field values of the content item currently being rendered.
pub trait FieldSource {
	/// `None` when the current item has no field values.
	fn current_fields(&self) -> Option<Value>;
}

/// A [`FieldSource`] that always returns the same value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticFields(Option<Value>);

impl StaticFields {
	pub fn new(fields: Value) -> Self {
		Self(Some(fields))
	}

	pub fn empty() -> Self {
		Self(None)
	}
}

impl FieldSource for StaticFields {
	fn current_fields(&self) -> Option<Value> {
		self.0.clone()
	}
}
