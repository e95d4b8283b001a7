//! Event-based tree construction
//!
//! External parsers describe a document as a flat stream of start/token/
//! trivia/finish events, the same shape rowan's `GreenNodeBuilder` accepts.
//! Trivia is attached to tokens only when the tree is finished, because
//! whether a comment trails the previous token or leads the next one depends
//! on what follows it.

use super::trivia::Trivia;
use super::{DocumentId, NodeId, SyntaxKind, SyntaxTree};
use crate::{Result, ShifterError};

#[derive(Debug)]
enum Event {
    Start(SyntaxKind),
    Token(SyntaxKind, String),
    Trivia(Trivia),
    Finish,
}

#[derive(Debug, Default)]
struct TokenSlot {
    leading: Vec<Trivia>,
    trailing: Vec<Trivia>,
}

/// Builder for [`SyntaxTree`]
#[derive(Debug)]
pub struct TreeBuilder {
    document: DocumentId,
    events: Vec<Event>,
    error: Option<String>,
}

impl TreeBuilder {
    pub fn new(document: impl Into<DocumentId>) -> Self {
        Self {
            document: document.into(),
            events: Vec::new(),
            error: None,
        }
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    /// Open a branch node
    pub fn start_node(&mut self, kind: SyntaxKind) {
        if !kind.is_node() {
            self.fail(format!("{kind} is not a node kind"));
        }
        self.events.push(Event::Start(kind));
    }

    /// Close the innermost open node
    pub fn finish_node(&mut self) {
        self.events.push(Event::Finish);
    }

    /// Add a token to the innermost open node
    pub fn token(&mut self, kind: SyntaxKind, text: impl Into<String>) {
        if !kind.is_token() {
            self.fail(format!("{kind} is not a token kind"));
        }
        self.events.push(Event::Token(kind, text.into()));
    }

    /// Add trivia between tokens
    pub fn trivia(&mut self, kind: SyntaxKind, text: impl Into<String>) {
        if !kind.is_trivia() {
            self.fail(format!("{kind} is not a trivia kind"));
        }
        self.events.push(Event::Trivia(Trivia::new(kind, text)));
    }

    pub fn whitespace(&mut self, text: impl Into<String>) {
        self.trivia(SyntaxKind::Whitespace, text);
    }

    pub fn newline(&mut self) {
        self.trivia(SyntaxKind::Newline, "\n");
    }

    /// Add a `//` or `/* */` comment
    pub fn comment(&mut self, text: impl Into<String>) {
        let text = text.into();
        let kind = if text.starts_with("/*") {
            SyntaxKind::BlockComment
        } else {
            SyntaxKind::LineComment
        };
        self.trivia(kind, text);
    }

    /// Assign every trivia piece to a token boundary
    fn attach_trivia(&self) -> Result<Vec<TokenSlot>> {
        let mut slots: Vec<TokenSlot> = Vec::new();
        let mut pending: Vec<Trivia> = Vec::new();
        let mut trailing_open = false;

        for event in &self.events {
            match event {
                Event::Token(..) => {
                    slots.push(TokenSlot {
                        leading: std::mem::take(&mut pending),
                        trailing: Vec::new(),
                    });
                    trailing_open = true;
                }
                Event::Trivia(trivia) => match slots.last_mut() {
                    Some(slot) if trailing_open => {
                        trailing_open = !trivia.is_newline();
                        slot.trailing.push(trivia.clone());
                    }
                    _ => pending.push(trivia.clone()),
                },
                Event::Start(_) | Event::Finish => {}
            }
        }

        if !pending.is_empty() {
            match slots.last_mut() {
                Some(slot) => slot.trailing.append(&mut pending),
                None => {
                    return Err(ShifterError::invalid_tree(
                        "document has trivia but no token to carry it",
                    ));
                }
            }
        }
        Ok(slots)
    }

    /// Allocate the tree
    pub fn finish(self) -> Result<SyntaxTree> {
        if let Some(message) = &self.error {
            return Err(ShifterError::invalid_tree(message.clone()));
        }
        let mut slots = self.attach_trivia()?.into_iter();

        let mut tree = SyntaxTree::empty(self.document.clone());
        let mut stack: Vec<(SyntaxKind, Vec<NodeId>)> = Vec::new();
        let mut root: Option<NodeId> = None;

        for event in self.events {
            match event {
                Event::Start(kind) => {
                    if root.is_some() {
                        return Err(ShifterError::invalid_tree(
                            "document has more than one root node",
                        ));
                    }
                    stack.push((kind, Vec::new()));
                }
                Event::Token(kind, text) => {
                    let slot = slots.next().unwrap_or_default();
                    let id = tree.alloc_token_with_trivia(kind, text, slot.leading, slot.trailing);
                    let Some((_, children)) = stack.last_mut() else {
                        return Err(ShifterError::invalid_tree(format!(
                            "token {kind} outside of any node"
                        )));
                    };
                    children.push(id);
                }
                Event::Trivia(_) => {}
                Event::Finish => {
                    let Some((kind, children)) = stack.pop() else {
                        return Err(ShifterError::invalid_tree(
                            "finish_node without a matching start_node",
                        ));
                    };
                    let id = tree.alloc_node(kind, children);
                    match stack.last_mut() {
                        Some((_, parent)) => parent.push(id),
                        None => root = Some(id),
                    }
                }
            }
        }

        if let Some((kind, _)) = stack.last() {
            return Err(ShifterError::invalid_tree(format!(
                "node {kind} was never finished"
            )));
        }
        let root = root.ok_or_else(|| ShifterError::invalid_tree("document has no root node"))?;
        tree.set_root(root);
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_trivia_stops_at_newline() {
        let mut builder = TreeBuilder::new("a.cs");
        builder.start_node(SyntaxKind::CompilationUnit);
        builder.token(SyntaxKind::Ident, "a");
        builder.whitespace(" ");
        builder.comment("// one");
        builder.newline();
        builder.whitespace("    ");
        builder.token(SyntaxKind::Ident, "b");
        builder.finish_node();
        let tree = builder.finish().expect("tree");

        let tokens = tree.children(tree.root()).to_vec();
        let a = tree.token(tokens[0]).expect("token a");
        assert_eq!(a.trailing.len(), 3);
        assert!(a.trailing[2].is_newline());
        let b = tree.token(tokens[1]).expect("token b");
        assert_eq!(b.leading, vec![Trivia::whitespace("    ")]);
        assert_eq!(tree.text(tree.root()), "a // one\n    b");
    }

    #[test]
    fn test_trailing_end_of_file_trivia_goes_to_last_token() {
        let mut builder = TreeBuilder::new("a.cs");
        builder.start_node(SyntaxKind::CompilationUnit);
        builder.token(SyntaxKind::Ident, "a");
        builder.newline();
        builder.newline();
        builder.finish_node();
        let tree = builder.finish().expect("tree");
        assert_eq!(tree.text(tree.root()), "a\n\n");
    }

    #[test]
    fn test_unbalanced_nodes_are_rejected() {
        let mut builder = TreeBuilder::new("a.cs");
        builder.start_node(SyntaxKind::CompilationUnit);
        builder.token(SyntaxKind::Ident, "a");
        assert!(builder.finish().is_err());

        let mut builder = TreeBuilder::new("a.cs");
        builder.finish_node();
        assert!(builder.finish().is_err());
    }

    #[test]
    fn test_kind_misuse_is_rejected() {
        let mut builder = TreeBuilder::new("a.cs");
        builder.start_node(SyntaxKind::Ident);
        builder.finish_node();
        assert!(builder.finish().is_err());

        let mut builder = TreeBuilder::new("a.cs");
        builder.start_node(SyntaxKind::CompilationUnit);
        builder.token(SyntaxKind::UsingDirective, "using");
        builder.finish_node();
        assert!(builder.finish().is_err());
    }

    #[test]
    fn test_empty_document_is_rejected() {
        assert!(TreeBuilder::new("a.cs").finish().is_err());
    }

    #[test]
    fn test_empty_root_is_allowed() {
        let mut builder = TreeBuilder::new("a.cs");
        builder.start_node(SyntaxKind::CompilationUnit);
        builder.finish_node();
        let tree = builder.finish().expect("tree");
        assert_eq!(tree.text(tree.root()), "");
    }
}
