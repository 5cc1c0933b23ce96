//! sc-core - Core library for samconv
//!
//! Shared types for converting legacy T-SQL views into dbt models: table
//! references, naming rules, ref/source classification, configuration, and
//! the dbt metadata documents written next to the converted models.

pub mod canonical;
pub mod categorize;
pub mod config;
pub mod conversion;
pub mod error;
pub mod metadata;
pub mod model_name;
pub mod naming;
mod newtype_string;
pub mod table_ref;

pub use canonical::CanonicalNames;
pub use categorize::{categorize_refs, classify_ref, RefKind};
pub use config::{Config, DuplicatePolicy, OutputLayout};
pub use conversion::{CategorizedRefs, ConversionResult};
pub use error::{CoreError, CoreResult};
pub use metadata::{
    write_model_refs, write_sources, ModelRefEntry, ModelRefsDocument, SourceGroup, SourceTable,
    SourcesDocument,
};
pub use model_name::{ModelName, SourceName};
pub use naming::{derive_model_name, strip_legacy_suffix, to_identifier_case};
pub use table_ref::TableRef;
