use std::path::Path;
use std::path::PathBuf;
use std::process;

use blockyard_cli::BlockyardCli;
use blockyard_cli::Commands;
use blockyard_cli::OutputFormat;
use blockyard_core::BlockRegistry;
use blockyard_core::Blocks;
use blockyard_core::BlocksError;
use blockyard_core::Hooks;
use blockyard_core::HostCapabilities;
use blockyard_core::JinjaEngine;
use blockyard_core::Notices;
use blockyard_core::RegistrationReport;
use blockyard_core::RenderArgs;
use blockyard_core::RenderSession;
use blockyard_core::Settings;
use blockyard_core::Severity;
use blockyard_core::StaticFields;
use blockyard_core::dashboard::Viewer;
use blockyard_core::dashboard::list_block_names;
use blockyard_core::dashboard::render_block_page;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = BlockyardCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Check { format }) => run_check(&args, *format),
		Some(Commands::List { plain }) => run_list(&args, *plain),
		Some(Commands::Render {
			name,
			data,
			preview,
			inserter_preview,
		}) => run_render(&args, name, data.as_deref(), *preview, *inserter_preview),
		None => {
			eprintln!("No subcommand specified. Run `blockyard --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<BlocksError>() {
			Ok(blocks_err) => {
				let report: miette::Report = (*blocks_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so stdout stays clean for rendered output. `RUST_LOG`
/// takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init()
		.ok();
}

fn resolve_root(args: &BlockyardCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load settings, check the host and register every block.
fn register(args: &BlockyardCli) -> Result<(Blocks, BlockRegistry, RegistrationReport), BlocksError> {
	let root = resolve_root(args);
	let settings = Settings::load(&root)?;
	tracing::debug!(root = %root.display(), namespace = %settings.namespace, "loaded settings");

	let mut notices = Notices::new();
	let mut blocks = Blocks::bootstrap(
		settings,
		Hooks::new(),
		HostCapabilities::all(),
		&mut notices,
	)?;
	let mut registry = BlockRegistry::new(blocks.settings().namespace.clone());
	let report = blocks.register_blocks(&mut registry);

	Ok((blocks, registry, report))
}

fn run_check(args: &BlockyardCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let (mut blocks, _registry, report) = register(args)?;
	let notices = blocks.take_notices();

	match format {
		OutputFormat::Json => {
			let notices: Vec<_> = notices.iter().collect();
			let output = serde_json::json!({
				"ok": !report.aborted && !notices.iter().any(|n| n.severity == Severity::Error),
				"report": report,
				"notices": notices,
			});
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
		OutputFormat::Text => {
			for notice in notices.iter() {
				let label = match notice.severity {
					Severity::Error => colored!("error:", red),
					Severity::Warning => colored!("warning:", yellow),
					Severity::Info | Severity::Success => colored!("info:", green),
				};
				match &notice.title {
					Some(title) => println!("{label} {title}: {}", notice.plain_message()),
					None => println!("{label} {}", notice.plain_message()),
				}
			}

			if !notices.is_empty() {
				println!();
			}
			println!(
				"{} registered, {} vetoed, {} failed",
				report.registered.len(),
				report.vetoed.len(),
				report.failed.len()
			);
		}
	}

	if report.aborted || notices.has_errors() {
		if matches!(format, OutputFormat::Text) {
			eprintln!(
				"\n{}",
				colored!("Block configuration has errors. Fix the problems above.", red)
			);
		}
		process::exit(1);
	}

	if matches!(format, OutputFormat::Text) {
		println!("{}", colored!("All block configurations are valid.", green));
	}

	Ok(())
}

fn run_list(args: &BlockyardCli, plain: bool) -> Result<(), Box<dyn std::error::Error>> {
	let (blocks, registry, _report) = register(args)?;
	let namespace = blocks.settings().namespace.as_str();

	if plain {
		let names = list_block_names(&registry, namespace);
		if names.is_empty() {
			println!("No blocks registered.");
			return Ok(());
		}

		for name in names {
			println!("{name}");
		}
		return Ok(());
	}

	if let Some(page) = render_block_page(&registry, namespace, Viewer::admin())? {
		print!("{page}");
	}

	Ok(())
}

fn run_render(
	args: &BlockyardCli,
	name: &str,
	data: Option<&Path>,
	preview: bool,
	inserter_preview: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let (blocks, registry, _report) = register(args)?;
	let namespace = registry.namespace();
	let namespaced = if name.starts_with(namespace) {
		name.to_string()
	} else {
		format!("{namespace}{name}")
	};

	let instance = registry
		.instance(&namespaced)
		.ok_or_else(|| BlocksError::UnknownBlock(namespaced.clone()))?;
	let fields = match data {
		Some(path) => StaticFields::new(load_field_data(path)?),
		None => StaticFields::empty(),
	};
	let engine = JinjaEngine::from_settings(blocks.settings());
	let mut session = RenderSession::new(&fields, &engine).with_inserter_preview(inserter_preview);

	let rendered = registry.render(
		&blocks,
		&mut session,
		&instance,
		RenderArgs {
			is_preview: preview,
		},
	)?;
	print!("{}", rendered.html);

	Ok(())
}

/// Read field data from a `.json` file, or parse anything else as YAML.
fn load_field_data(path: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
	let content = std::fs::read_to_string(path)?;
	let is_json = path
		.extension()
		.is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

	let value = if is_json {
		serde_json::from_str(&content)?
	} else {
		serde_yaml_ng::from_str(&content)?
	};

	Ok(value)
}
