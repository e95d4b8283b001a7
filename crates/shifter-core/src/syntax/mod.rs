//! Syntax tree model
//!
//! The tree is lossless: concatenating every token with its leading and
//! trailing trivia reproduces the source exactly. Nodes are immutable and
//! live in an arena owned by [`SyntaxTree`]; rewrites allocate new nodes and
//! share every untouched subtree.
//!
//! ## Shape contract
//!
//! Parsers feeding the engine must produce at least:
//!
//! - `UsingDirective`: `UsingKw`, optional `StaticKw`, a name node
//!   (`IdentifierName` or `QualifiedName`), `Semicolon`
//! - `QualifiedName`: name node, `Dot`, `IdentifierName` (left-nested)
//! - `ObjectCreationExpression`: `NewKw`, a name node for the type, optional
//!   `ArgumentList`
//! - `ArgumentList`: `OpenParen`, `Argument` nodes separated by `Comma`,
//!   `CloseParen`
//! - `MemberAccessExpression`: expression, `Dot`, `IdentifierName`
//!
//! ## Example
//!
//! ```rust
//! use shifter_core::syntax::{SyntaxKind, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new("Startup.cs");
//! builder.start_node(SyntaxKind::CompilationUnit);
//! builder.start_node(SyntaxKind::UsingDirective);
//! builder.token(SyntaxKind::UsingKw, "using");
//! builder.whitespace(" ");
//! builder.start_node(SyntaxKind::IdentifierName);
//! builder.token(SyntaxKind::Ident, "PagedList");
//! builder.finish_node();
//! builder.token(SyntaxKind::Semicolon, ";");
//! builder.finish_node();
//! builder.finish_node();
//!
//! let tree = builder.finish().unwrap();
//! assert_eq!(tree.text(tree.root()), "using PagedList;");
//! ```

mod builder;
mod kind;
mod tree;

pub mod trivia;

pub use builder::TreeBuilder;
pub use kind::{KindClass, SyntaxKind};
pub use tree::{DocumentId, NodeHandle, NodeId, Preorder, SyntaxTree, TokenData, TreeId};
pub use trivia::Trivia;
