//! Syntactic matchers for the built-in migrations
//!
//! Both matchers compare rendered source text only. No symbol resolution is
//! done, so a user type that happens to share the target name matches too.

use shifter_core::syntax::{NodeId, SyntaxKind, SyntaxTree};
use shifter_core::{MatchData, MatchResult, Matcher};

/// Field holding the identifier extracted from a constructor argument
pub const ARGUMENT_IDENTIFIER: &str = "argument_identifier";

/// Name child of a using directive
pub(crate) fn directive_name(tree: &SyntaxTree, directive: NodeId) -> Option<NodeId> {
    tree.child_nodes(directive)
        .find(|child| tree.kind(*child).is_name())
}

/// Type reference child of an object creation expression
pub(crate) fn type_reference(tree: &SyntaxTree, creation: NodeId) -> Option<NodeId> {
    tree.child_nodes(creation)
        .find(|child| tree.kind(*child).is_name())
}

/// Node inside `type_ref` that spells `target`: an `IdentifierName` with that
/// text, or the whole reference when `target` is itself dotted
///
/// Only the type reference is searched, never the argument list, so
/// `new Wrapper(HttpStatusCodeResult.Default)` does not match
/// `HttpStatusCodeResult`. A construction nested inside the arguments is
/// matched on its own node.
pub(crate) fn type_identifier(tree: &SyntaxTree, type_ref: NodeId, target: &str) -> Option<NodeId> {
    tree.descendant_nodes(type_ref)
        .find(|node| {
            tree.kind(*node) == SyntaxKind::IdentifierName && tree.trimmed_text(*node) == target
        })
        .or_else(|| (tree.trimmed_text(type_ref) == target).then_some(type_ref))
}

/// Matches `using <target>;` on the exact, whole qualified name
#[derive(Debug, Clone)]
pub struct DirectiveNameMatcher {
    target: String,
}

impl DirectiveNameMatcher {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Matcher for DirectiveNameMatcher {
    fn matches(&self, tree: &SyntaxTree, node: NodeId) -> MatchResult {
        if tree.kind(node) != SyntaxKind::UsingDirective {
            return MatchResult::NoMatch;
        }
        let Some(name) = directive_name(tree, node) else {
            return MatchResult::Malformed("using directive has no name".to_string());
        };

        let text = tree.trimmed_text(name);
        if text == self.target {
            MatchResult::Matched(MatchData::new(text))
        } else {
            MatchResult::NoMatch
        }
    }
}

/// Matches `new <target>(...)` and extracts the member name of its single
/// argument, e.g. `NotFound` from `HttpStatusCode.NotFound`
#[derive(Debug, Clone)]
pub struct ConstructorArgumentMatcher {
    target_type: String,
}

impl ConstructorArgumentMatcher {
    pub fn new(target_type: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
        }
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }
}

impl Matcher for ConstructorArgumentMatcher {
    fn matches(&self, tree: &SyntaxTree, node: NodeId) -> MatchResult {
        if tree.kind(node) != SyntaxKind::ObjectCreationExpression {
            return MatchResult::NoMatch;
        }
        let Some(type_ref) = type_reference(tree, node) else {
            return MatchResult::Malformed("object creation has no type".to_string());
        };
        if type_identifier(tree, type_ref, &self.target_type).is_none() {
            return MatchResult::NoMatch;
        }

        let data = MatchData::new(tree.trimmed_text(node));
        match argument_identifier(tree, node) {
            Some(identifier) => MatchResult::Matched(data.with_field(ARGUMENT_IDENTIFIER, identifier)),
            None => MatchResult::Matched(data),
        }
    }
}

/// Identifier named by the only argument, when there is exactly one argument
/// with exactly one candidate identifier
fn argument_identifier(tree: &SyntaxTree, creation: NodeId) -> Option<String> {
    let list = tree.child_of_kind(creation, SyntaxKind::ArgumentList)?;
    let mut arguments = tree
        .child_nodes(list)
        .filter(|child| tree.kind(*child) == SyntaxKind::Argument);
    let argument = arguments.next()?;
    if arguments.next().is_some() {
        return None;
    }

    let mut candidates = Vec::new();
    collect_member_names(tree, argument, false, &mut candidates);
    match candidates.as_slice() {
        [only] => Some(tree.trimmed_text(*only)),
        _ => None,
    }
}

/// `IdentifierName`s not in qualifier position: for `A.B.C` only `C`
fn collect_member_names(tree: &SyntaxTree, node: NodeId, qualifier: bool, out: &mut Vec<NodeId>) {
    let kind = tree.kind(node);
    if kind == SyntaxKind::IdentifierName {
        if !qualifier {
            out.push(node);
        }
        return;
    }

    let qualifies_first = matches!(
        kind,
        SyntaxKind::MemberAccessExpression | SyntaxKind::QualifiedName
    );
    for (index, child) in tree.child_nodes(node).enumerate() {
        let child_qualifier = qualifier || (qualifies_first && index == 0);
        collect_member_names(tree, child, child_qualifier, out);
    }
}
