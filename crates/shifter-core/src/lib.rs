//! Shifter Core
//!
//! Core engine for rule-based source migration.
//! This crate provides the syntax tree model, the rule contracts, the walker
//! that reports matches, and the fix applier that rewrites trees.

pub mod autofix;
pub mod cancel;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod result;
pub mod rules;
pub mod syntax; // Lossless, arena-backed syntax tree
pub mod walker;

// Re-export commonly used types
pub use autofix::{BatchFixResult, FixApplier, FixPreview, unified_diff};
pub use cancel::CancellationToken;
pub use config::{ConfigLoader, EngineConfig, FixConfig, RuleToggle, WalkerConfig};
pub use diagnostics::{
    CollectingReporter, Diagnostic, DiagnosticKey, DiagnosticReporter, Severity, SourceSpan,
};
pub use error::{ErrorKind, FixError, ShifterError, StaleMatch};
pub use result::{Result, ResultExt};
pub use rules::{MatchData, MatchResult, Matcher, MigrationRule, Rewriter, RuleRegistry};
pub use syntax::{DocumentId, NodeHandle, NodeId, SyntaxKind, SyntaxTree, TreeBuilder};
pub use walker::{WalkStats, Walker};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shifter=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_installs_subscriber() {
        init_tracing();
        assert!(tracing::dispatcher::has_been_set());
        tracing::info!("{} {} ready", NAME, VERSION);
    }
}
