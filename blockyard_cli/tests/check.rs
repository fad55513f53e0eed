mod common;

use blockyard_cli::BlockyardCli;
use blockyard_cli::Commands;
use blockyard_cli::OutputFormat;
use blockyard_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn check_passes_with_valid_blocks() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_block(
		tmp.path(),
		"hero",
		"title: 'Hero'\n",
		Some("<section>{{ name }}</section>"),
	);

	let mut cmd = common::blockyard_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("1 registered, 0 vetoed, 0 failed"))
		.stdout(predicates::str::contains("All block configurations are valid."));

	Ok(())
}

#[test]
fn check_fails_on_missing_title() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_block(tmp.path(), "hero", "category: layout\n", Some(""));

	let mut cmd = common::blockyard_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("error: Theme: block configuration:"))
		.stdout(predicates::str::contains("is missing a title"))
		.stderr(predicates::str::contains("Block configuration has errors"));

	Ok(())
}

#[test]
fn check_fails_on_invalid_yaml_but_reports_other_blocks() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_block(tmp.path(), "broken", "title: [unclosed\n", Some(""));
	common::write_block(tmp.path(), "hero", "title: Hero\n", Some(""));

	let mut cmd = common::blockyard_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("Failed to parse"))
		.stdout(predicates::str::contains("1 registered, 0 vetoed, 1 failed"));

	Ok(())
}

#[test]
fn check_warns_about_missing_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_block(tmp.path(), "hero", "title: Hero\n", None);

	let mut cmd = common::blockyard_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("warning: Theme: block template:"))
		.stdout(predicates::str::contains("hero.twig"))
		.stdout(predicates::str::contains("error:").not());

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_block(tmp.path(), "hero", "title: Hero\n", Some(""));
	common::write_block(tmp.path(), "untitled", "mode: auto\n", Some(""));

	let mut cmd = common::blockyard_cmd();
	let output = cmd
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["report"]["registered"], serde_json::json!(["hero"]));
	assert_eq!(
		json["report"]["failed"],
		serde_json::json!(["views/blocks/untitled.yml"])
	);
	assert_eq!(json["notices"][0]["severity"], "error");

	Ok(())
}

#[test]
fn check_reads_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("blockyard.toml"),
		"directories = [\"blocks\"]\n",
	)?;
	std::fs::create_dir_all(tmp.path().join("blocks"))?;
	std::fs::write(tmp.path().join("blocks/cta.yml"), "title: CTA\n")?;
	std::fs::write(tmp.path().join("blocks/cta.twig"), "")?;
	common::write_block(tmp.path(), "hero", "title: Hero\n", Some(""));

	let mut cmd = common::blockyard_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("1 registered"));

	Ok(())
}

#[test]
fn check_reports_invalid_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("blockyard.toml"), "namespace = [\n")?;

	let mut cmd = common::blockyard_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn missing_subcommand_exits_with_usage_hint() -> AnyEmptyResult {
	let mut cmd = common::blockyard_cmd();
	cmd.assert()
		.code(1)
		.stderr(predicates::str::contains("No subcommand specified"));

	Ok(())
}

#[test]
fn check_format_defaults_to_text() {
	use clap::Parser;

	let cli = BlockyardCli::parse_from(["blockyard", "check"]);
	match cli.command {
		Some(Commands::Check { format }) => assert!(matches!(format, OutputFormat::Text)),
		_ => panic!("expected Check command"),
	}

	let cli = BlockyardCli::parse_from(["blockyard", "--no-color", "check", "--format", "json"]);
	assert!(cli.no_color);
	match cli.command {
		Some(Commands::Check { format }) => assert!(matches!(format, OutputFormat::Json)),
		_ => panic!("expected Check command"),
	}
}
