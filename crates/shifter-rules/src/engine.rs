//! Migration engine facade
//!
//! Binds a configured rule registry to the walker and the fix applier.

use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use shifter_core::{
    BatchFixResult, CancellationToken, CollectingReporter, ConfigLoader, Diagnostic,
    DiagnosticReporter, DocumentId, EngineConfig, FixApplier, FixError, FixPreview, Result,
    ResultExt, RuleRegistry, SyntaxTree, WalkStats, Walker,
};

use crate::builtin::builtin_registry;

/// Diagnostics found in one document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    pub document: DocumentId,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: WalkStats,
}

/// Default migration engine over the built-in rules
#[derive(Debug, Clone)]
pub struct DefaultMigrationEngine {
    registry: RuleRegistry,
    config: EngineConfig,
}

impl DefaultMigrationEngine {
    /// Engine with every built-in rule and default settings
    pub fn new() -> Self {
        Self {
            registry: builtin_registry().clone(),
            config: EngineConfig::default(),
        }
    }

    /// Engine with the built-in rules filtered by `config`
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Self::with_registry(builtin_registry(), config)
    }

    /// Engine over any registry, filtered by `config`
    pub fn with_registry(registry: &RuleRegistry, config: EngineConfig) -> Result<Self> {
        let registry = registry.configured(&config)?;
        tracing::debug!("Migration engine ready with rules: {:?}", registry.ids());
        Ok(Self { registry, config })
    }

    /// Engine configured from a `.toml`, `.json` or `.jsonc` file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        Self::with_config(ConfigLoader::load_from_file(path)?)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn walker(&self) -> Walker<'_> {
        Walker::with_config(&self.registry, self.config.walker.clone())
    }

    fn applier(&self) -> FixApplier<'_> {
        FixApplier::with_config(&self.registry, self.config.fixes.clone())
    }

    /// Report every match in `tree` to `reporter`
    pub fn analyze(
        &self,
        tree: &SyntaxTree,
        reporter: &dyn DiagnosticReporter,
        cancel: &CancellationToken,
    ) -> Result<WalkStats> {
        self.walker().walk(tree, reporter, cancel)
    }

    /// Diagnostics for `tree`, ordered by span
    pub fn diagnostics(&self, tree: &SyntaxTree) -> Result<Vec<Diagnostic>> {
        let reporter = CollectingReporter::new();
        self.analyze(tree, &reporter, &CancellationToken::new())?;
        Ok(reporter.into_sorted())
    }

    /// Walk many documents in parallel
    ///
    /// Documents whose tree is rejected are logged and left out.
    pub fn analyze_documents(
        &self,
        trees: &[SyntaxTree],
        cancel: &CancellationToken,
    ) -> Vec<DocumentReport> {
        let reports: Vec<DocumentReport> = trees
            .par_iter()
            .filter_map(|tree| {
                let reporter = CollectingReporter::new();
                let stats = self.analyze(tree, &reporter, cancel).log_and_continue()?;
                Some(DocumentReport {
                    document: tree.document().clone(),
                    diagnostics: reporter.into_sorted(),
                    stats,
                })
            })
            .collect();

        tracing::info!(
            "Analyzed {} of {} documents, {} diagnostics",
            reports.len(),
            trees.len(),
            reports.iter().map(|r| r.diagnostics.len()).sum::<usize>()
        );
        reports
    }

    /// Apply the fix for one diagnostic
    pub fn fix(
        &self,
        tree: &mut SyntaxTree,
        diagnostic: &Diagnostic,
    ) -> std::result::Result<(), FixError> {
        self.applier().apply_one(tree, diagnostic)
    }

    /// Apply a set of diagnostics to one document
    pub fn fix_all(
        &self,
        tree: SyntaxTree,
        diagnostics: &[Diagnostic],
        cancel: &CancellationToken,
    ) -> BatchFixResult {
        self.applier().apply_all(tree, diagnostics, cancel)
    }

    /// Analyze `tree` and apply every fix found
    pub fn migrate(&self, tree: SyntaxTree, cancel: &CancellationToken) -> Result<BatchFixResult> {
        let reporter = CollectingReporter::new();
        self.analyze(&tree, &reporter, cancel)?;
        Ok(self.fix_all(tree, &reporter.into_sorted(), cancel))
    }

    /// What applying `diagnostics` would change, without touching `tree`
    pub fn preview(
        &self,
        tree: &SyntaxTree,
        diagnostics: &[Diagnostic],
        cancel: &CancellationToken,
    ) -> FixPreview {
        self.applier().preview(tree, diagnostics, cancel)
    }
}

impl Default for DefaultMigrationEngine {
    fn default() -> Self {
        Self::new()
    }
}
