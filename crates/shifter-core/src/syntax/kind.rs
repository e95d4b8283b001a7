//! Syntax kind enumeration
//!
//! This module defines every node, token and trivia type that can appear in a
//! migration syntax tree. The set is closed: parsers feeding the engine map
//! their own grammar onto these kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntax kind for tree elements
///
/// The numeric layout groups the kinds:
/// - Trivia (0-9)
/// - Keywords (10-49)
/// - Identifiers, literals and punctuation (50-99)
/// - Branch nodes (100+)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u16)]
pub enum SyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Spaces and tabs
    Whitespace = 0,
    /// A line break (`\n` or `\r\n`)
    Newline = 1,
    /// Line comment starting with `//`
    LineComment = 2,
    /// Block comment `/* ... */`
    BlockComment = 3,

    // ==================
    // Keywords (10-49)
    // ==================
    /// "using" keyword
    UsingKw = 10,
    /// "new" keyword
    NewKw = 11,
    /// "return" keyword
    ReturnKw = 12,
    /// "static" keyword (in `using static`)
    StaticKw = 13,
    /// "namespace" keyword
    NamespaceKw = 14,
    /// "class" keyword
    ClassKw = 15,
    /// Any other keyword (modifiers, `var`, ...)
    Keyword = 16,

    // ==================
    // Identifiers, literals, punctuation (50-99)
    // ==================
    /// Identifier
    Ident = 50,
    /// Numeric, string or character literal
    Literal = 51,
    /// `.`
    Dot = 60,
    /// `;`
    Semicolon = 61,
    /// `,`
    Comma = 62,
    /// `=`
    Equals = 63,
    /// `(`
    OpenParen = 64,
    /// `)`
    CloseParen = 65,
    /// `{`
    OpenBrace = 66,
    /// `}`
    CloseBrace = 67,
    /// Any other operator or punctuation
    Punct = 68,

    // ==================
    // Nodes (100+)
    // ==================
    /// Document root
    CompilationUnit = 100,
    /// `using X.Y;`
    UsingDirective = 101,
    /// `namespace X { ... }`
    NamespaceDeclaration = 102,
    /// `class X { ... }`
    ClassDeclaration = 103,
    /// Method declaration with its body
    MethodDeclaration = 104,
    /// `{ ... }`
    Block = 105,
    /// Expression followed by `;`
    ExpressionStatement = 106,
    /// `return expr;`
    ReturnStatement = 107,
    /// `var x = expr;`
    LocalDeclaration = 108,
    /// Left-nested dotted name: `QualifiedName(Name, Dot, IdentifierName)`
    QualifiedName = 110,
    /// A single identifier used as a name
    IdentifierName = 111,
    /// `new Type(args)`
    ObjectCreationExpression = 112,
    /// `target(args)`
    InvocationExpression = 113,
    /// `expr.Name`
    MemberAccessExpression = 114,
    /// `( arg, arg )`
    ArgumentList = 115,
    /// One argument of an argument list
    Argument = 116,
    /// A literal wrapped as an expression
    LiteralExpression = 117,
    /// `x = y` inside an object initializer or declaration
    EqualsValueClause = 118,
    /// Source the parser could not classify
    Error = 119,
}

/// Element category of a [`SyntaxKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClass {
    Trivia,
    Token,
    Node,
}

impl SyntaxKind {
    /// Classify this kind
    pub const fn class(self) -> KindClass {
        match self {
            Self::Whitespace | Self::Newline | Self::LineComment | Self::BlockComment => {
                KindClass::Trivia
            }
            Self::UsingKw
            | Self::NewKw
            | Self::ReturnKw
            | Self::StaticKw
            | Self::NamespaceKw
            | Self::ClassKw
            | Self::Keyword
            | Self::Ident
            | Self::Literal
            | Self::Dot
            | Self::Semicolon
            | Self::Comma
            | Self::Equals
            | Self::OpenParen
            | Self::CloseParen
            | Self::OpenBrace
            | Self::CloseBrace
            | Self::Punct => KindClass::Token,
            Self::CompilationUnit
            | Self::UsingDirective
            | Self::NamespaceDeclaration
            | Self::ClassDeclaration
            | Self::MethodDeclaration
            | Self::Block
            | Self::ExpressionStatement
            | Self::ReturnStatement
            | Self::LocalDeclaration
            | Self::QualifiedName
            | Self::IdentifierName
            | Self::ObjectCreationExpression
            | Self::InvocationExpression
            | Self::MemberAccessExpression
            | Self::ArgumentList
            | Self::Argument
            | Self::LiteralExpression
            | Self::EqualsValueClause
            | Self::Error => KindClass::Node,
        }
    }

    /// Check if this is trivia
    pub const fn is_trivia(self) -> bool {
        matches!(self.class(), KindClass::Trivia)
    }

    /// Check if this is a token (keyword, identifier, literal, punctuation)
    pub const fn is_token(self) -> bool {
        matches!(self.class(), KindClass::Token)
    }

    /// Check if this is a branch node
    pub const fn is_node(self) -> bool {
        matches!(self.class(), KindClass::Node)
    }

    /// Check if this is a keyword
    pub const fn is_keyword(self) -> bool {
        (self as u16) >= 10 && (self as u16) < 50
    }

    /// Check if this node kind is a (possibly qualified) name
    pub const fn is_name(self) -> bool {
        matches!(self, Self::IdentifierName | Self::QualifiedName)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classes() {
        assert!(SyntaxKind::Whitespace.is_trivia());
        assert!(SyntaxKind::LineComment.is_trivia());
        assert!(SyntaxKind::Ident.is_token());
        assert!(SyntaxKind::Semicolon.is_token());
        assert!(SyntaxKind::UsingDirective.is_node());
        assert!(!SyntaxKind::UsingDirective.is_token());
    }

    #[test]
    fn test_keyword_range() {
        assert!(SyntaxKind::UsingKw.is_keyword());
        assert!(SyntaxKind::Keyword.is_keyword());
        assert!(!SyntaxKind::Ident.is_keyword());
        assert!(!SyntaxKind::CompilationUnit.is_keyword());
    }

    #[test]
    fn test_name_kinds() {
        assert!(SyntaxKind::IdentifierName.is_name());
        assert!(SyntaxKind::QualifiedName.is_name());
        assert!(!SyntaxKind::MemberAccessExpression.is_name());
    }
}
