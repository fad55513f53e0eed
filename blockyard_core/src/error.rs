use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum BlocksError {
	#[error(transparent)]
	#[diagnostic(code(blockyard::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(blockyard::config_parse),
		help("check that blockyard.toml is valid TOML with [theme], [site] and/or [extensions] sections")
	)]
	ConfigParse(String),

	#[error("required host capability is missing: {0}")]
	#[diagnostic(
		code(blockyard::missing_dependency),
		help("block registration is disabled until the host provides this capability")
	)]
	MissingDependency(String),

	#[error("the directories hook must return a list of strings, got: {0}")]
	#[diagnostic(
		code(blockyard::invalid_directory_list),
		help("return something like `[\"views/blocks\"]` from the directories hook")
	)]
	InvalidDirectoryList(String),

	#[error("failed to list block directory `{directory}`: {reason}")]
	#[diagnostic(
		code(blockyard::directory_read),
		help("check that the block directory exists and is readable")
	)]
	DirectoryRead { directory: String, reason: String },

	#[error("failed to parse block configuration `{path}`: {reason}")]
	#[diagnostic(code(blockyard::block_parse))]
	BlockParse { path: String, reason: String },

	#[error("block configuration `{directory}/{file}` is missing a `title`")]
	#[diagnostic(
		code(blockyard::missing_title),
		help("add `title: 'My Block'` to the block configuration")
	)]
	MissingTitle { directory: String, file: String },

	#[error("invalid value for `{field}` in block configuration `{file}`: {reason}")]
	#[diagnostic(code(blockyard::invalid_field))]
	InvalidField {
		file: String,
		field: String,
		reason: String,
	},

	#[error("block template `{directory}/{file}` is missing")]
	#[diagnostic(
		code(blockyard::missing_template),
		help("create the template next to the block configuration")
	)]
	MissingTemplate { directory: String, file: String },

	#[error("no template found for block `{name}`, searched: {searched}")]
	#[diagnostic(code(blockyard::template_not_found))]
	TemplateNotFound { name: String, searched: String },

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(blockyard::template_render))]
	TemplateRender(String),

	#[error("no block registered under `{0}`")]
	#[diagnostic(
		code(blockyard::unknown_block),
		help("run `blockyard list` to see the registered blocks")
	)]
	UnknownBlock(String),
}

pub type BlocksResult<T> = Result<T, BlocksError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
