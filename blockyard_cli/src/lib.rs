use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Discover, register and preview YAML-configured theme blocks.",
	long_about = "blockyard discovers block definitions written as YAML files in a theme, \
	              registers them with an in-memory block registry and renders them through their \
	              sibling templates.\n\nEach block lives in `views/blocks/<name>.yml` next to \
	              `<name>.twig` and an optional `<name>.jpg` preview image.\n\nQuick start:\n  \
	              blockyard check          Validate every block configuration\n  blockyard list  \
	              List the registered blocks\n  blockyard render hero    Render one block to \
	              stdout"
)]
pub struct BlockyardCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the theme root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output. Debug logs are written to stderr.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Register every block and report problems with their configuration.
	///
	/// Scans the configured block directories, validates each configuration
	/// file and prints the notices an administrator would see. Exits with a
	/// non-zero status code when any error notice was raised, which makes it
	/// suitable for CI.
	Check {
		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the registered blocks.
	///
	/// Prints the same block overview page the administrative dashboard
	/// shows. Use `--plain` for one block name per line.
	List {
		/// Print one block name per line instead of the HTML page.
		#[arg(long, default_value_t = false)]
		plain: bool,
	},
	/// Render one block to stdout.
	///
	/// Registers every block, then renders the named block through its
	/// template. Field data is read from a JSON or YAML file.
	Render {
		/// The block name, with or without the namespace prefix (`hero` or
		/// `acf/hero`).
		name: String,

		/// JSON or YAML file holding the field values for the block.
		#[arg(long)]
		data: Option<PathBuf>,

		/// Render as an editor preview, running the preview data hooks.
		#[arg(long, default_value_t = false)]
		preview: bool,

		/// Treat the request as a block inserter preview query.
		#[arg(long, default_value_t = false)]
		inserter_preview: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output with the registration report and every notice.
	Json,
}
