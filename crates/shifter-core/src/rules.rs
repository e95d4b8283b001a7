//! Rule, matcher and rewriter contracts, and the rule registry

use biome_text_size::TextRange;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, Severity, SourceSpan};
use crate::error::StaleMatch;
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};
use crate::{Result, ShifterError};

/// Placeholder in message templates replaced by the matched text
pub const MATCHED_PLACEHOLDER: &str = "{matched}";

/// Data a matcher extracts for its rewriter
///
/// Owned strings only, so it outlives the tree it was taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchData {
    /// Trimmed text of the matched node
    pub matched_text: String,
    /// Extracted named values
    pub fields: BTreeMap<String, String>,
}

impl MatchData {
    pub fn new(matched_text: impl Into<String>) -> Self {
        Self {
            matched_text: matched_text.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Outcome of asking a matcher about one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The node is not an instance of the pattern
    NoMatch,
    /// The node has the right kind but lacks a child the pattern relies on
    Malformed(String),
    Matched(MatchData),
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    pub fn into_data(self) -> Option<MatchData> {
        match self {
            MatchResult::Matched(data) => Some(data),
            _ => None,
        }
    }
}

/// Decides whether a node is an instance of a migration pattern
pub trait Matcher: Send + Sync {
    fn matches(&self, tree: &SyntaxTree, node: NodeId) -> MatchResult;
}

/// Builds the replacement for a matched node
///
/// Implementations allocate into `tree` and return a detached subtree; the
/// caller splices it in place of `node`. The current root is never moved by a
/// rewriter.
pub trait Rewriter: Send + Sync {
    fn rewrite(
        &self,
        tree: &mut SyntaxTree,
        node: NodeId,
        data: &MatchData,
    ) -> std::result::Result<NodeId, StaleMatch>;
}

/// A migration rule: which nodes to look at, how to recognise the obsolete
/// pattern, how to report it, and how to fix it
#[derive(Clone)]
pub struct MigrationRule {
    id: String,
    title: String,
    message_template: String,
    severity: Severity,
    target_kinds: Vec<SyntaxKind>,
    matcher: Arc<dyn Matcher>,
    rewriter: Arc<dyn Rewriter>,
}

impl MigrationRule {
    pub fn new(
        id: impl Into<String>,
        target_kinds: impl Into<Vec<SyntaxKind>>,
        matcher: impl Matcher + 'static,
        rewriter: impl Rewriter + 'static,
    ) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            message_template: MATCHED_PLACEHOLDER.to_string(),
            id,
            severity: Severity::Warning,
            target_kinds: target_kinds.into(),
            matcher: Arc::new(matcher),
            rewriter: Arc::new(rewriter),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Message template; `{matched}` is replaced by the matched text
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn target_kinds(&self) -> &[SyntaxKind] {
        &self.target_kinds
    }

    pub fn applies_to(&self, kind: SyntaxKind) -> bool {
        self.target_kinds.contains(&kind)
    }

    pub fn matcher(&self) -> &dyn Matcher {
        self.matcher.as_ref()
    }

    pub fn rewriter(&self) -> &dyn Rewriter {
        self.rewriter.as_ref()
    }

    pub fn format_message(&self, data: &MatchData) -> String {
        self.message_template
            .replace(MATCHED_PLACEHOLDER, &data.matched_text)
    }

    /// Diagnostic for a match on `node`, whose trimmed span is `range`
    pub fn diagnostic(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        range: TextRange,
        data: &MatchData,
    ) -> Diagnostic {
        Diagnostic::new(
            self.id.clone(),
            self.title.clone(),
            self.format_message(data),
            self.severity,
            SourceSpan::new(tree.document().clone(), range),
        )
        .with_node(tree.handle(node))
    }
}

impl fmt::Debug for MigrationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationRule")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("severity", &self.severity)
            .field("target_kinds", &self.target_kinds)
            .finish_non_exhaustive()
    }
}

/// Registered rules, unique by id and indexed by target kind
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<MigrationRule>>,
    by_id: HashMap<String, usize>,
    by_kind: HashMap<SyntaxKind, Vec<usize>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule; ids must be unique
    pub fn register(&mut self, rule: MigrationRule) -> Result<()> {
        self.register_shared(Arc::new(rule))
    }

    fn register_shared(&mut self, rule: Arc<MigrationRule>) -> Result<()> {
        if self.by_id.contains_key(rule.id()) {
            return Err(ShifterError::rule_error(
                rule.id(),
                "a rule with this id is already registered",
            ));
        }
        if rule.target_kinds().iter().any(|kind| !kind.is_node()) {
            return Err(ShifterError::rule_error(
                rule.id(),
                "target kinds must be branch node kinds",
            ));
        }

        let index = self.rules.len();
        for kind in rule.target_kinds() {
            let slots = self.by_kind.entry(*kind).or_default();
            if !slots.contains(&index) {
                slots.push(index);
            }
        }
        self.by_id.insert(rule.id().to_string(), index);
        tracing::debug!("Registered rule '{}'", rule.id());
        self.rules.push(rule);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&MigrationRule> {
        self.by_id.get(id).map(|index| self.rules[*index].as_ref())
    }

    /// Rules in registration order
    pub fn rules(&self) -> impl Iterator<Item = &MigrationRule> + '_ {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Rules targeting `kind`, in registration order
    pub fn rules_for(&self, kind: SyntaxKind) -> impl Iterator<Item = &MigrationRule> + '_ {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|index| self.rules[*index].as_ref())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Active subset under `config`
    ///
    /// Every rule id named in the configuration must be registered here.
    pub fn configured(&self, config: &EngineConfig) -> Result<RuleRegistry> {
        config.validate()?;
        let unknown: Vec<&str> = config
            .rules
            .keys()
            .map(String::as_str)
            .filter(|id| !self.by_id.contains_key(*id))
            .collect();
        if !unknown.is_empty() {
            return Err(ShifterError::config_error(format!(
                "unknown rule id(s) in configuration: {}",
                unknown.join(", ")
            )));
        }

        let mut active = RuleRegistry::new();
        for rule in &self.rules {
            if config.is_rule_enabled(rule.id()) {
                active.register_shared(Arc::clone(rule))?;
            } else {
                tracing::debug!("Rule '{}' disabled by configuration", rule.id());
            }
        }
        Ok(active)
    }
}
