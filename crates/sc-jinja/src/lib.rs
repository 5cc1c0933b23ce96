//! sc-jinja - dbt macro injection for samconv
//!
//! Rewrites converted SQL so references to other models become
//! `{{ ref('model') }}` and references to external tables become
//! `{{ source('group', 'table') }}`.

pub mod error;
pub mod inject;
pub mod macros;

pub use error::{InjectError, InjectResult};
pub use inject::{inject_dbt_macros, inject_into_sql, InjectSummary, Injected};
pub use macros::{ref_macro, source_macro};
