mod common;

use blockyard_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn list_plain_prints_sorted_names() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_block(tmp.path(), "hero", "title: Hero\n", Some(""));
	common::write_block(tmp.path(), "cta", "title: CTA\n", Some(""));

	let mut cmd = common::blockyard_cmd();
	cmd.arg("list")
		.arg("--plain")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("cta\nhero\n");

	Ok(())
}

#[test]
fn list_plain_without_blocks() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::blockyard_cmd();
	cmd.arg("list")
		.arg("--plain")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No blocks registered."));

	Ok(())
}

#[test]
fn list_renders_block_page() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_block(tmp.path(), "hero", "title: Hero\n", Some(""));

	let mut cmd = common::blockyard_cmd();
	cmd.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("<h1>Available theme blocks</h1>"))
		.stdout(predicates::str::contains("<li><code>hero</code></li>"));

	Ok(())
}

#[test]
fn list_skips_broken_blocks() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_block(tmp.path(), "broken", "- not\n- a mapping\n", Some(""));
	common::write_block(tmp.path(), "hero", "title: Hero\n", Some(""));

	let mut cmd = common::blockyard_cmd();
	cmd.arg("list")
		.arg("--plain")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("hero"))
		.stdout(predicates::str::contains("broken").not());

	Ok(())
}
