//! Trivia attached to token boundaries
//!
//! Whitespace, line breaks and comments carry no meaning for matching but
//! must survive every rewrite byte for byte. Each token owns the trivia that
//! precedes it (leading) and the trivia that follows it up to and including
//! the next line break (trailing).

use super::SyntaxKind;

/// A single piece of trivia
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trivia {
    /// The kind of trivia (always a trivia kind)
    pub kind: SyntaxKind,
    /// The text content
    pub text: String,
}

impl Trivia {
    /// Create a new trivia piece
    pub fn new(kind: SyntaxKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Whitespace trivia
    pub fn whitespace(text: impl Into<String>) -> Self {
        Self::new(SyntaxKind::Whitespace, text)
    }

    /// A single `\n`
    pub fn newline() -> Self {
        Self::new(SyntaxKind::Newline, "\n")
    }

    /// Check if this is a comment
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, SyntaxKind::LineComment | SyntaxKind::BlockComment)
    }

    /// Check if this is whitespace (including line breaks)
    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, SyntaxKind::Whitespace | SyntaxKind::Newline)
    }

    /// Check if this is a line break
    pub fn is_newline(&self) -> bool {
        self.kind == SyntaxKind::Newline
    }

    /// Byte length of the text
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    /// Check if the text is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Total byte length of a trivia run
pub fn trivia_len(trivia: &[Trivia]) -> u32 {
    trivia.iter().map(Trivia::len).sum()
}

/// Render a trivia run back to source text
pub fn trivia_text(trivia: &[Trivia], out: &mut String) {
    for piece in trivia {
        out.push_str(&piece.text);
    }
}
