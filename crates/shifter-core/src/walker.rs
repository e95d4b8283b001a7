//! Tree walker
//!
//! One depth-first, pre-order pass over a tree. Each branch node is offered
//! to the rules indexed under its kind; matches become diagnostics on the
//! reporter. Tokens are never offered to rules.

use biome_text_size::TextSize;
use rayon::prelude::*;
use serde::Serialize;

use crate::cancel::CancellationToken;
use crate::config::WalkerConfig;
use crate::diagnostics::DiagnosticReporter;
use crate::rules::{MatchResult, RuleRegistry};
use crate::syntax::{NodeId, SyntaxTree};
use crate::{Result, ShifterError};

/// Counters for one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkStats {
    /// Branch nodes visited
    pub nodes_visited: usize,
    pub diagnostics_reported: usize,
    /// Nodes a matcher rejected as malformed
    pub malformed_nodes: usize,
    /// The walk stopped early on cancellation
    pub cancelled: bool,
}

impl WalkStats {
    pub fn merge(self, other: WalkStats) -> WalkStats {
        WalkStats {
            nodes_visited: self.nodes_visited + other.nodes_visited,
            diagnostics_reported: self.diagnostics_reported + other.diagnostics_reported,
            malformed_nodes: self.malformed_nodes + other.malformed_nodes,
            cancelled: self.cancelled || other.cancelled,
        }
    }
}

/// Runs the rules of a registry over trees
#[derive(Debug, Clone)]
pub struct Walker<'r> {
    registry: &'r RuleRegistry,
    config: WalkerConfig,
}

impl<'r> Walker<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            config: WalkerConfig::default(),
        }
    }

    pub fn with_config(registry: &'r RuleRegistry, config: WalkerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &RuleRegistry {
        self.registry
    }

    /// Walk `tree`, reporting every match to `reporter`
    pub fn walk(
        &self,
        tree: &SyntaxTree,
        reporter: &dyn DiagnosticReporter,
        cancel: &CancellationToken,
    ) -> Result<WalkStats> {
        let root = tree.root();
        if tree.is_token(root) {
            return Err(ShifterError::invalid_tree(format!(
                "root of '{}' is a {} token, expected a node",
                tree.document(),
                tree.kind(root)
            )));
        }

        if self.registry.is_empty() {
            tracing::debug!("No rules registered, skipping walk of '{}'", tree.document());
            return Ok(WalkStats::default());
        }

        let parallel = self.config.parallel
            && tree.children(root).len() >= self.config.min_parallel_children.max(1);

        let stats = if parallel {
            self.walk_parallel(tree, reporter, cancel)
        } else {
            self.walk_subtree(tree, root, TextSize::from(0), reporter, cancel)
        };

        tracing::debug!(
            "Walked '{}': {} nodes, {} diagnostics, {} malformed{}",
            tree.document(),
            stats.nodes_visited,
            stats.diagnostics_reported,
            stats.malformed_nodes,
            if stats.cancelled { " (cancelled)" } else { "" }
        );
        Ok(stats)
    }

    /// Root on the calling thread, root children on the rayon pool
    fn walk_parallel(
        &self,
        tree: &SyntaxTree,
        reporter: &dyn DiagnosticReporter,
        cancel: &CancellationToken,
    ) -> WalkStats {
        let root = tree.root();
        if cancel.is_cancelled() {
            return WalkStats {
                cancelled: true,
                ..WalkStats::default()
            };
        }
        let mut root_stats = WalkStats::default();
        self.visit(tree, root, TextSize::from(0), reporter, &mut root_stats);

        let mut offset = 0u32;
        let subtrees: Vec<(NodeId, TextSize)> = tree
            .children(root)
            .iter()
            .map(|child| {
                let start = TextSize::from(offset);
                offset += u32::from(tree.full_len(*child));
                (*child, start)
            })
            .collect();

        let children_stats = subtrees
            .par_iter()
            .map(|(child, start)| self.walk_subtree(tree, *child, *start, reporter, cancel))
            .reduce(WalkStats::default, WalkStats::merge);

        root_stats.merge(children_stats)
    }

    fn walk_subtree(
        &self,
        tree: &SyntaxTree,
        from: NodeId,
        start: TextSize,
        reporter: &dyn DiagnosticReporter,
        cancel: &CancellationToken,
    ) -> WalkStats {
        let mut stats = WalkStats::default();
        for (node, offset) in tree.preorder(from, start) {
            if tree.is_token(node) {
                continue;
            }
            if cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            self.visit(tree, node, offset, reporter, &mut stats);
        }
        stats
    }

    fn visit(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        offset: TextSize,
        reporter: &dyn DiagnosticReporter,
        stats: &mut WalkStats,
    ) {
        stats.nodes_visited += 1;
        for rule in self.registry.rules_for(tree.kind(node)) {
            match rule.matcher().matches(tree, node) {
                MatchResult::NoMatch => {}
                MatchResult::Malformed(reason) => {
                    tracing::warn!(
                        "Rule '{}' skipped malformed {} in '{}' at {}: {}",
                        rule.id(),
                        tree.kind(node),
                        tree.document(),
                        u32::from(offset),
                        reason
                    );
                    stats.malformed_nodes += 1;
                }
                MatchResult::Matched(data) => {
                    let range = tree.span_at(node, offset);
                    reporter.report(rule.diagnostic(tree, node, range, &data));
                    stats.diagnostics_reported += 1;
                }
            }
        }
    }
}
