//! tagforge-core: tag templating and numbering engine.
//!
//! The engine owns no storage. Callers supply a read-only [`dataset::Dataset`]
//! snapshot plus a mutable [`dataset::Counters`] cache, and append the tags
//! the generator returns. All operations are synchronous and in-process; see
//! [`dataset`] for the concurrency model and its limits.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums with stable `code()` identifiers in
//!   the engine; `anyhow::Result` at application boundaries.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod assembly;
pub mod config;
pub mod counter;
pub mod dataset;
pub mod edit;
pub mod generate;
pub mod inherit;
pub mod model;
pub mod resolve;

pub use assembly::{AssemblyComponent, ExpandedTag, expand_assembly, instantiate_assembly};
pub use config::ProjectConfig;
pub use counter::{compute_prefix, next_number, peek_next_number};
pub use dataset::{CounterKey, Counters, Dataset};
pub use generate::{
    GenerateError, GenerateMode, GenerateOutcome, GenerateRequest, compute_preview, generate,
};
pub use inherit::resolve_parent_ref;
pub use model::block::{BlockKind, ParentSource, TemplateBlock};
pub use model::reference::{DictionaryItem, GlobalVariable, Project, ReservedRange};
pub use model::tag::{AuditEntry, Tag, TagStatus};
pub use model::template::{DEFAULT_PADDING, Template, TemplateError};
pub use resolve::{resolve_dictionary, resolve_global_var};
