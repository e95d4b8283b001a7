//! Fix application for a single document
//!
//! Fixes are applied against the tree, not the text: each diagnostic is
//! re-located (by node handle, falling back to its span), re-matched, and the
//! rule's rewriter output is spliced in with a path copy. Diagnostics are
//! processed in descending span order so earlier spans never move under a
//! pending fix. A fix inside an enclosing match rebuilds the enclosing node;
//! its pending handle is re-pointed at the copy.

use std::collections::{BTreeMap, HashMap};

use similar::{ChangeTag, TextDiff};

use crate::cancel::CancellationToken;
use crate::config::FixConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKey};
use crate::error::{FixError, StaleMatch};
use crate::rules::{MatchData, MatchResult, MigrationRule, RuleRegistry};
use crate::syntax::{DocumentId, NodeHandle, NodeId, SyntaxTree};

/// Outcome of a batch of fixes on one document
#[derive(Debug, Clone)]
pub struct BatchFixResult {
    /// The tree after every successful fix
    pub tree: SyntaxTree,
    /// Diagnostics whose fix was applied, in application order
    pub fixed: Vec<Diagnostic>,
    /// Diagnostics left unfixed, with the reason
    pub not_fixed: Vec<(Diagnostic, FixError)>,
    /// Cancellation was observed before the batch finished
    pub cancelled: bool,
}

impl BatchFixResult {
    pub fn fixed_count(&self) -> usize {
        self.fixed.len()
    }

    /// Every submitted fix was applied
    pub fn is_complete(&self) -> bool {
        self.not_fixed.is_empty()
    }
}

/// Before/after text of a document with a unified diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixPreview {
    pub document: DocumentId,
    /// Original document text
    pub original: String,
    /// Text after applying fixes
    pub modified: String,
    /// Number of fixes applied
    pub fixed: usize,
    /// Diff showing the changes
    pub diff: String,
}

impl FixPreview {
    pub fn new(document: DocumentId, original: String, modified: String, fixed: usize) -> Self {
        let diff = unified_diff(&original, &modified, document.as_str());
        Self {
            document,
            original,
            modified,
            fixed,
            diff,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.original != self.modified
    }
}

/// Applies diagnostics of registered rules to trees
#[derive(Debug, Clone)]
pub struct FixApplier<'r> {
    registry: &'r RuleRegistry,
    config: FixConfig,
}

impl<'r> FixApplier<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            config: FixConfig::default(),
        }
    }

    pub fn with_config(registry: &'r RuleRegistry, config: FixConfig) -> Self {
        Self { registry, config }
    }

    /// Apply the fix for one diagnostic
    ///
    /// On error the tree's root is unchanged.
    pub fn apply_one(&self, tree: &mut SyntaxTree, diagnostic: &Diagnostic) -> Result<(), FixError> {
        self.apply_tracked(tree, diagnostic, &Moved::new())
            .map(|_| ())
    }

    /// `apply_one` with handles re-pointed through `moved`; returns the
    /// ancestors the replacement copied
    fn apply_tracked(
        &self,
        tree: &mut SyntaxTree,
        diagnostic: &Diagnostic,
        moved: &Moved,
    ) -> Result<Vec<(NodeId, NodeId)>, FixError> {
        let rule = self
            .registry
            .get(&diagnostic.rule_id)
            .ok_or_else(|| FixError::UnknownRule(diagnostic.rule_id.clone()))?;

        if &diagnostic.span.document != tree.document() {
            return Err(FixError::DocumentMismatch {
                expected: tree.document().to_string(),
                found: diagnostic.span.document.to_string(),
            });
        }

        let node = Self::locate(rule, tree, diagnostic, moved).ok_or_else(|| {
            FixError::stale(
                rule.id(),
                StaleMatch::new(format!(
                    "no {:?} node found for {}",
                    rule.target_kinds(),
                    diagnostic.span
                )),
            )
        })?;

        let data = Self::rematch(rule, tree, node).map_err(|e| FixError::stale(rule.id(), e))?;
        let replacement = rule
            .rewriter()
            .rewrite(tree, node, &data)
            .map_err(|e| FixError::stale(rule.id(), e))?;
        let copied = tree
            .replace(node, replacement)
            .map_err(|e| FixError::stale(rule.id(), e))?;

        tracing::debug!("Applied '{}' at {}", rule.id(), diagnostic.span);
        Ok(copied)
    }

    /// Node handle first, then the recorded span among the rule's kinds
    fn locate(
        rule: &MigrationRule,
        tree: &SyntaxTree,
        diagnostic: &Diagnostic,
        moved: &Moved,
    ) -> Option<NodeId> {
        diagnostic
            .node
            .map(|handle| NodeHandle {
                node: follow(moved, handle.node),
                ..handle
            })
            .and_then(|handle| tree.resolve(handle))
            .filter(|node| rule.applies_to(tree.kind(*node)))
            .or_else(|| tree.find_by_span(rule.target_kinds(), diagnostic.span.range()))
    }

    fn rematch(
        rule: &MigrationRule,
        tree: &SyntaxTree,
        node: NodeId,
    ) -> Result<MatchData, StaleMatch> {
        match rule.matcher().matches(tree, node) {
            MatchResult::Matched(data) => Ok(data),
            MatchResult::NoMatch => Err(StaleMatch::new("node no longer matches the rule")),
            MatchResult::Malformed(reason) => {
                Err(StaleMatch::new(format!("node is malformed: {reason}")))
            }
        }
    }

    /// Apply a set of diagnostics to one document
    ///
    /// Duplicates are dropped, the rest run in descending span order. A fix
    /// that fails is recorded and skipped; the others still apply.
    pub fn apply_all(
        &self,
        mut tree: SyntaxTree,
        diagnostics: &[Diagnostic],
        cancel: &CancellationToken,
    ) -> BatchFixResult {
        let mut unique: BTreeMap<DiagnosticKey, &Diagnostic> = BTreeMap::new();
        for diagnostic in diagnostics {
            unique.entry(diagnostic.key()).or_insert(diagnostic);
        }
        let mut ordered: Vec<&Diagnostic> = unique.into_values().collect();
        ordered.sort_by(|a, b| {
            b.span
                .start
                .cmp(&a.span.start)
                .then(b.span.end.cmp(&a.span.end))
                .then(a.rule_id.cmp(&b.rule_id))
        });

        let mut fixed = Vec::new();
        let mut not_fixed = Vec::new();
        let mut cancelled = false;
        // ancestors copied by earlier fixes; a pending fix on an enclosing
        // node follows its handle to the copy
        let mut moved = Moved::new();

        for diagnostic in ordered {
            if cancelled || cancel.is_cancelled() {
                cancelled = true;
                not_fixed.push((diagnostic.clone(), FixError::Cancelled));
                continue;
            }
            if let Some(limit) = self.config.max_per_document
                && fixed.len() >= limit
            {
                not_fixed.push((diagnostic.clone(), FixError::LimitReached(limit)));
                continue;
            }

            match self.apply_tracked(&mut tree, diagnostic, &moved) {
                Ok(copied) => {
                    moved.extend(copied);
                    fixed.push(diagnostic.clone());
                }
                Err(err) => {
                    tracing::warn!("Fix not applied: {}", err);
                    not_fixed.push((diagnostic.clone(), err));
                }
            }
        }

        tracing::info!(
            "Applied {} of {} fixes to '{}'",
            fixed.len(),
            fixed.len() + not_fixed.len(),
            tree.document()
        );

        BatchFixResult {
            tree,
            fixed,
            not_fixed,
            cancelled,
        }
    }

    /// Apply fixes to a copy of `tree` and describe the change
    pub fn preview(
        &self,
        tree: &SyntaxTree,
        diagnostics: &[Diagnostic],
        cancel: &CancellationToken,
    ) -> FixPreview {
        let original = tree.text(tree.root());
        let result = self.apply_all(tree.clone(), diagnostics, cancel);
        let modified = result.tree.text(result.tree.root());
        FixPreview::new(
            tree.document().clone(),
            original,
            modified,
            result.fixed_count(),
        )
    }
}

/// Old node id to the copy that replaced it
type Moved = HashMap<NodeId, NodeId>;

/// Latest copy of `node`
fn follow(moved: &Moved, mut node: NodeId) -> NodeId {
    while let Some(next) = moved.get(&node) {
        node = *next;
    }
    node
}

/// Unified diff between two texts, three lines of context
pub fn unified_diff(original: &str, modified: &str, label: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    output.push_str(&format!("--- {label}\n"));
    output.push_str(&format!("+++ {label} (modified)\n"));

    for group in diff.grouped_ops(3) {
        let Some(first) = group.first() else {
            continue;
        };
        let old_len = group.iter().map(|op| op.old_range().len()).sum::<usize>();
        let new_len = group.iter().map(|op| op.new_range().len()).sum::<usize>();
        output.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            first.old_range().start + 1,
            old_len,
            first.new_range().start + 1,
            new_len
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                let line = change.value();
                output.push(sign);
                output.push_str(line);
                if !line.ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}
