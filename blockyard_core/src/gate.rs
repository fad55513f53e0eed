use crate::hooks::Hooks;

/// Replace `-` with `_` so the identifier can be embedded in hook names.
pub fn normalize_identifier(identifier: &str) -> String {
	identifier.replace('-', "_")
}

/// Decide whether the block `identifier` should be registered.
///
/// Registration is allowed by default. When the identifier contains a `-`
/// the veto chain for the literal identifier runs first; the chain for the
/// normalized identifier always runs last and sees the earlier decision.
pub fn should_register(hooks: &Hooks, identifier: &str) -> bool {
	let normalized = normalize_identifier(identifier);
	let mut allow = true;

	if identifier != normalized {
		allow = hooks.apply_register(identifier, allow);
	}

	allow = hooks.apply_register(&normalized, allow);

	if !allow {
		tracing::warn!(block = identifier, "registration vetoed by hook");
	}

	allow
}
