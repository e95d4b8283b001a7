//! Shifter Rules
//!
//! Built-in migration rules and the migration engine.
//! This crate provides the ASP.NET MVC to ASP.NET Core rule set: the
//! matchers and rewriters it is built from, the status code lookup table,
//! and an engine facade over the core walker and fix applier.

pub mod builtin;
pub mod engine;
pub mod matchers;
pub mod rewriters;
pub mod status_codes;

// Re-export commonly used types
pub use builtin::{BuiltinRules, HTTP_STATUS_CODE_RESULT, PAGED_LIST_USING, builtin_registry};
pub use engine::{DefaultMigrationEngine, DocumentReport};
pub use matchers::{ARGUMENT_IDENTIFIER, ConstructorArgumentMatcher, DirectiveNameMatcher};
pub use rewriters::{ConstructorRewriter, DirectiveRewriter, ResolveFn};
pub use status_codes::{DEFAULT_RESULT, STATUS_CODE_RESULTS, resolve_status_code_result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
