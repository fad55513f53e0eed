use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn blockyard_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("blockyard"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Write `views/blocks/<name>.yml` and, when given, `views/blocks/<name>.twig`.
pub fn write_block(root: &Path, name: &str, config: &str, template: Option<&str>) {
	let dir = root.join("views/blocks");
	std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	std::fs::write(dir.join(format!("{name}.yml")), config)
		.unwrap_or_else(|e| panic!("write config: {e}"));

	if let Some(template) = template {
		std::fs::write(dir.join(format!("{name}.twig")), template)
			.unwrap_or_else(|e| panic!("write template: {e}"));
	}
}
