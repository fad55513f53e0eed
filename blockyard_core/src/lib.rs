//! `blockyard_core` discovers declarative block definitions in a theme,
//! registers them with a host block registry, and renders them through a
//! template engine with field data from a forms layer.
//!
//! ## Pipeline
//!
//! ```text
//! theme directory (views/blocks)
//!   → Scanner (resolves directories, lists *.yml files)
//!   → Loader (parses YAML into a raw mapping)
//!   → Descriptor builder (validates, defaults, finds the preview image)
//!   → Override gate (registration veto hooks)
//!   → Registry client (hands the descriptor to the host)
//!
//! host renders a block
//!   → render callback (field data → filters → context → template engine)
//! ```
//!
//! ## Block files
//!
//! Each block is one YAML file named after the block. A template and an
//! optional preview image sit next to it:
//!
//! ```text
//! views/blocks/
//!   hero.yml    title: 'Hero' (required), category, mode, align, ...
//!   hero.twig   the template rendered for the block
//!   hero.jpg    shown in the block inserter
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use blockyard_core::BlockRegistry;
//! use blockyard_core::Blocks;
//! use blockyard_core::Hooks;
//! use blockyard_core::JinjaEngine;
//! use blockyard_core::RenderArgs;
//! use blockyard_core::RenderSession;
//! use blockyard_core::Settings;
//! use blockyard_core::StaticFields;
//!
//! let settings = Settings::load(Path::new(".")).unwrap();
//! let mut blocks = Blocks::new(settings, Hooks::new());
//! let mut registry = BlockRegistry::new(blocks.settings().namespace.clone());
//! let report = blocks.register_blocks(&mut registry);
//! println!("registered {} block(s)", report.registered.len());
//!
//! let fields = StaticFields::empty();
//! let engine = JinjaEngine::from_settings(blocks.settings());
//! let mut session = RenderSession::new(&fields, &engine);
//! let instance = registry.instance("acf/hero").unwrap();
//! let rendered = registry
//! 	.render(&blocks, &mut session, &instance, RenderArgs::default())
//! 	.unwrap();
//! println!("{}", rendered.html);
//! ```

pub use blocks::*;
pub use config::Settings;
pub use descriptor::*;
pub use engine::*;
pub use error::*;
pub use fields::*;
pub use gate::*;
pub use hooks::*;
pub use loader::*;
pub use notices::Notice;
pub use notices::Notices;
pub use notices::Severity;
pub use registry::*;
pub use render::*;
pub use scanner::*;
pub use theme::*;

mod blocks;
pub mod config;
pub mod dashboard;
mod descriptor;
mod engine;
#[allow(unused_assignments)]
mod error;
mod fields;
mod gate;
mod hooks;
mod loader;
pub mod notices;
mod registry;
mod render;
mod scanner;
mod theme;

#[cfg(test)]
mod __fixtures;
