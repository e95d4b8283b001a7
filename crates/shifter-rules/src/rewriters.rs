//! Rewriters for the built-in migrations
//!
//! Each rewriter returns a detached copy of the matched node. Only the parts
//! that change are reallocated; keywords, punctuation and their trivia are
//! the original nodes.

use shifter_core::syntax::{NodeId, SyntaxKind, SyntaxTree};
use shifter_core::{MatchData, Rewriter, StaleMatch};

use crate::matchers::{ARGUMENT_IDENTIFIER, directive_name, type_identifier, type_reference};

/// Replaces the name of a using directive with a fixed name
#[derive(Debug, Clone)]
pub struct DirectiveRewriter {
    replacement: String,
}

impl DirectiveRewriter {
    pub fn new(replacement: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
        }
    }
}

impl Rewriter for DirectiveRewriter {
    fn rewrite(
        &self,
        tree: &mut SyntaxTree,
        node: NodeId,
        _data: &MatchData,
    ) -> Result<NodeId, StaleMatch> {
        if tree.kind(node) != SyntaxKind::UsingDirective {
            return Err(StaleMatch::new(format!(
                "expected a using directive, found {}",
                tree.kind(node)
            )));
        }
        let name = directive_name(tree, node)
            .ok_or_else(|| StaleMatch::new("using directive has no name"))?;

        let new_name = tree.build_name(&self.replacement);
        let new_name = tree.with_trivia_from(new_name, name);
        tree.replace_within(node, name, new_name)
            .ok_or_else(|| StaleMatch::new("name is not part of the directive"))
    }
}

/// Maps an extracted key to a replacement type name
pub type ResolveFn = fn(Option<&str>) -> &'static str;

/// Renames the constructed type and drops every constructor argument
///
/// `new HttpStatusCodeResult(HttpStatusCode.NotFound)` becomes
/// `new NotFoundResult()`. The replacement type comes from `resolve`, called
/// with the matcher's [`ARGUMENT_IDENTIFIER`] field.
#[derive(Debug, Clone)]
pub struct ConstructorRewriter {
    target_type: String,
    resolve: ResolveFn,
}

impl ConstructorRewriter {
    pub fn new(target_type: impl Into<String>, resolve: ResolveFn) -> Self {
        Self {
            target_type: target_type.into(),
            resolve,
        }
    }

    /// Swap the obsolete type name; a qualified replacement takes over the
    /// whole type reference so it is never qualified twice
    fn rename_type(
        &self,
        tree: &mut SyntaxTree,
        node: NodeId,
        replacement: &str,
    ) -> Result<NodeId, StaleMatch> {
        let type_ref = type_reference(tree, node)
            .ok_or_else(|| StaleMatch::new("object creation has no type"))?;
        let identifier = type_identifier(tree, type_ref, &self.target_type).ok_or_else(|| {
            StaleMatch::new(format!("type no longer names '{}'", self.target_type))
        })?;

        let old = if replacement.contains('.') {
            type_ref
        } else {
            identifier
        };
        let new_name = tree.build_name(replacement);
        let new_name = tree.with_trivia_from(new_name, old);
        tree.replace_within(node, old, new_name)
            .ok_or_else(|| StaleMatch::new("type is not part of the object creation"))
    }

    /// Empty the argument list, or add `()` when there is none
    fn clear_arguments(&self, tree: &mut SyntaxTree, node: NodeId) -> Result<NodeId, StaleMatch> {
        if let Some(list) = tree.child_of_kind(node, SyntaxKind::ArgumentList) {
            let kept: Vec<NodeId> = tree
                .children(list)
                .iter()
                .copied()
                .filter(|child| {
                    matches!(
                        tree.kind(*child),
                        SyntaxKind::OpenParen | SyntaxKind::CloseParen
                    )
                })
                .collect();
            let emptied = tree.with_children(list, kept);
            return tree
                .replace_within(node, list, emptied)
                .ok_or_else(|| StaleMatch::new("argument list is not part of the object creation"));
        }

        let type_ref = type_reference(tree, node)
            .ok_or_else(|| StaleMatch::new("object creation has no type"))?;
        let (bare_type, trailing) = tree.split_trailing_trivia(type_ref);
        let open = tree.alloc_token(SyntaxKind::OpenParen, "(");
        let close = tree.alloc_token_with_trivia(SyntaxKind::CloseParen, ")", Vec::new(), trailing);
        let list = tree.alloc_node(SyntaxKind::ArgumentList, vec![open, close]);

        let mut children = Vec::with_capacity(tree.children(node).len() + 1);
        for child in tree.children(node) {
            if *child == type_ref {
                children.push(bare_type);
                children.push(list);
            } else {
                children.push(*child);
            }
        }
        Ok(tree.with_children(node, children))
    }
}

impl Rewriter for ConstructorRewriter {
    fn rewrite(
        &self,
        tree: &mut SyntaxTree,
        node: NodeId,
        data: &MatchData,
    ) -> Result<NodeId, StaleMatch> {
        if tree.kind(node) != SyntaxKind::ObjectCreationExpression {
            return Err(StaleMatch::new(format!(
                "expected an object creation, found {}",
                tree.kind(node)
            )));
        }

        let replacement = (self.resolve)(data.field(ARGUMENT_IDENTIFIER));
        tracing::debug!(
            "Rewriting '{}' to '{}'",
            data.matched_text,
            replacement
        );

        let renamed = self.rename_type(tree, node, replacement)?;
        self.clear_arguments(tree, renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_codes::resolve_status_code_result;
    use shifter_core::TreeBuilder;

    /// `return new HttpStatusCodeResult(HttpStatusCode.<code>);`
    fn creation(code: Option<&str>) -> SyntaxTree {
        let mut builder = TreeBuilder::new("a.cs");
        builder.start_node(SyntaxKind::ReturnStatement);
        builder.token(SyntaxKind::ReturnKw, "return");
        builder.whitespace(" ");
        builder.start_node(SyntaxKind::ObjectCreationExpression);
        builder.token(SyntaxKind::NewKw, "new");
        builder.whitespace(" ");
        builder.start_node(SyntaxKind::IdentifierName);
        builder.token(SyntaxKind::Ident, "HttpStatusCodeResult");
        builder.finish_node();
        if let Some(code) = code {
            builder.start_node(SyntaxKind::ArgumentList);
            builder.token(SyntaxKind::OpenParen, "(");
            builder.start_node(SyntaxKind::Argument);
            builder.start_node(SyntaxKind::MemberAccessExpression);
            builder.start_node(SyntaxKind::IdentifierName);
            builder.token(SyntaxKind::Ident, "HttpStatusCode");
            builder.finish_node();
            builder.token(SyntaxKind::Dot, ".");
            builder.start_node(SyntaxKind::IdentifierName);
            builder.token(SyntaxKind::Ident, code);
            builder.finish_node();
            builder.finish_node();
            builder.finish_node();
            builder.token(SyntaxKind::CloseParen, ")");
            builder.finish_node();
        }
        builder.finish_node();
        builder.token(SyntaxKind::Semicolon, ";");
        builder.finish_node();
        builder.finish().unwrap()
    }

    fn rewrite(tree: &mut SyntaxTree, data: MatchData) -> String {
        let node = tree
            .descendant_nodes(tree.root())
            .find(|n| tree.kind(*n) == SyntaxKind::ObjectCreationExpression)
            .unwrap();
        let rewriter = ConstructorRewriter::new("HttpStatusCodeResult", resolve_status_code_result);
        let replacement = rewriter.rewrite(tree, node, &data).unwrap();
        tree.replace(node, replacement).unwrap();
        tree.text(tree.root())
    }

    #[test]
    fn test_constructor_rewrite() {
        let mut tree = creation(Some("NotFound"));
        let data = MatchData::new("").with_field(ARGUMENT_IDENTIFIER, "NotFound");
        assert_eq!(rewrite(&mut tree, data), "return new NotFoundResult();");
    }

    #[test]
    fn test_qualified_replacement() {
        let mut tree = creation(Some("InternalServerError"));
        let data = MatchData::new("").with_field(ARGUMENT_IDENTIFIER, "InternalServerError");
        assert_eq!(
            rewrite(&mut tree, data),
            "return new System.Web.Http.InternalServerErrorResult();"
        );
    }

    #[test]
    fn test_missing_argument_list_is_synthesised() {
        let mut tree = creation(None);
        assert_eq!(
            rewrite(&mut tree, MatchData::new("")),
            "return new BadRequestResult();"
        );
    }

    #[test]
    fn test_wrong_kind_is_stale() {
        let mut tree = creation(None);
        let root = tree.root();
        let rewriter = ConstructorRewriter::new("HttpStatusCodeResult", resolve_status_code_result);
        assert!(rewriter.rewrite(&mut tree, root, &MatchData::new("")).is_err());
        assert!(
            DirectiveRewriter::new("PagedList.Core")
                .rewrite(&mut tree, root, &MatchData::new(""))
                .is_err()
        );
        assert_eq!(tree.root(), root);
    }
}
