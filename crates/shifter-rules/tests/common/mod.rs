//! Test support: a tiny parser for the C# subset the rules look at
//!
//! Covers using directives, namespace and class bodies, blocks, `return`,
//! `var x = ...;` declarations and expression statements built from
//! identifiers, member access, invocation, `new` and literals.

#![allow(dead_code)]

use shifter_core::syntax::{NodeId, SyntaxKind, SyntaxTree, TreeBuilder};
use shifter_core::CancellationToken;
use shifter_rules::DefaultMigrationEngine;

pub const DOCUMENT: &str = "HomeController.cs";

/// Parse `source` as the default test document
pub fn parse(source: &str) -> SyntaxTree {
    parse_document(DOCUMENT, source)
}

pub fn parse_document(document: &str, source: &str) -> SyntaxTree {
    let mut parser = Parser {
        lexemes: lex(source),
        pos: 0,
    };
    let mut items = Vec::new();
    while parser.peek().is_some() {
        items.push(parser.item());
    }

    let mut builder = TreeBuilder::new(document);
    let mut next = 0;
    builder.start_node(SyntaxKind::CompilationUnit);
    for item in &items {
        parser.emit(item, &mut builder, &mut next);
    }
    parser.flush_trivia(parser.lexemes.len(), &mut builder, &mut next);
    builder.finish_node();
    let tree = builder.finish().expect("test source builds a valid tree");
    assert_eq!(tree.text(tree.root()), source, "tree must be lossless");
    tree
}

/// Full text of the current tree
pub fn text(tree: &SyntaxTree) -> String {
    tree.text(tree.root())
}

/// Branch nodes of `kind` in document order
pub fn nodes_of(tree: &SyntaxTree, kind: SyntaxKind) -> Vec<NodeId> {
    tree.descendant_nodes(tree.root())
        .filter(|node| tree.kind(*node) == kind)
        .collect()
}

/// Analyze and fix `source` with every built-in rule
pub fn migrate(source: &str) -> String {
    let engine = DefaultMigrationEngine::new();
    let result = engine
        .migrate(parse(source), &CancellationToken::new())
        .expect("migrate");
    assert!(result.is_complete(), "unfixed: {:?}", result.not_fixed);
    text(&result.tree)
}

fn lex(source: &str) -> Vec<(SyntaxKind, String)> {
    let chars: Vec<char> = source.chars().collect();
    let mut lexemes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let c = chars[i];
        let kind = if c == '\n' {
            i += 1;
            SyntaxKind::Newline
        } else if c == '\r' && chars.get(i + 1) == Some(&'\n') {
            i += 2;
            SyntaxKind::Newline
        } else if c == ' ' || c == '\t' {
            while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
                i += 1;
            }
            SyntaxKind::Whitespace
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' && chars[i] != '\r' {
                i += 1;
            }
            SyntaxKind::LineComment
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                i += 1;
            }
            i = (i + 2).min(chars.len());
            SyntaxKind::BlockComment
        } else if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            match word.as_str() {
                "using" => SyntaxKind::UsingKw,
                "new" => SyntaxKind::NewKw,
                "return" => SyntaxKind::ReturnKw,
                "static" => SyntaxKind::StaticKw,
                "namespace" => SyntaxKind::NamespaceKw,
                "class" => SyntaxKind::ClassKw,
                "public" | "private" | "var" => SyntaxKind::Keyword,
                _ => SyntaxKind::Ident,
            }
        } else if c.is_ascii_digit() {
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            SyntaxKind::Literal
        } else if c == '"' {
            i += 1;
            while i < chars.len() && chars[i] != '"' {
                i += 1;
            }
            i = (i + 1).min(chars.len());
            SyntaxKind::Literal
        } else {
            i += 1;
            match c {
                '.' => SyntaxKind::Dot,
                ';' => SyntaxKind::Semicolon,
                ',' => SyntaxKind::Comma,
                '=' => SyntaxKind::Equals,
                '(' => SyntaxKind::OpenParen,
                ')' => SyntaxKind::CloseParen,
                '{' => SyntaxKind::OpenBrace,
                '}' => SyntaxKind::CloseBrace,
                _ => SyntaxKind::Punct,
            }
        };
        lexemes.push((kind, chars[start..i].iter().collect()));
    }
    lexemes
}

enum Green {
    Node(SyntaxKind, Vec<Green>),
    Token(usize),
}

struct Parser {
    lexemes: Vec<(SyntaxKind, String)>,
    pos: usize,
}

impl Parser {
    fn skip_trivia(&mut self) {
        while self.pos < self.lexemes.len() && self.lexemes[self.pos].0.is_trivia() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<SyntaxKind> {
        self.skip_trivia();
        self.lexemes.get(self.pos).map(|(kind, _)| *kind)
    }

    /// Kind of the `n`th significant lexeme from the cursor
    fn peek_at(&self, n: usize) -> Option<SyntaxKind> {
        self.lexemes[self.pos..]
            .iter()
            .filter(|(kind, _)| !kind.is_trivia())
            .nth(n)
            .map(|(kind, _)| *kind)
    }

    fn bump(&mut self) -> Green {
        self.skip_trivia();
        assert!(self.pos < self.lexemes.len(), "unexpected end of input");
        self.pos += 1;
        Green::Token(self.pos - 1)
    }

    fn expect(&mut self, kind: SyntaxKind) -> Green {
        let found = self.peek();
        assert_eq!(found, Some(kind), "expected {kind} at lexeme {}", self.pos);
        self.bump()
    }

    fn eat(&mut self, kind: SyntaxKind, out: &mut Vec<Green>) {
        if self.peek() == Some(kind) {
            out.push(self.bump());
        }
    }

    fn item(&mut self) -> Green {
        if self.peek() == Some(SyntaxKind::Keyword)
            && self.peek_at(1) == Some(SyntaxKind::Ident)
            && self.peek_at(2) == Some(SyntaxKind::Equals)
        {
            return self.local_declaration();
        }

        let mut modifiers = Vec::new();
        while self.peek() == Some(SyntaxKind::Keyword) {
            modifiers.push(self.bump());
        }
        if self.peek() == Some(SyntaxKind::ClassKw) {
            modifiers.push(self.bump());
            modifiers.push(self.expect(SyntaxKind::Ident));
            modifiers.push(self.block());
            return Green::Node(SyntaxKind::ClassDeclaration, modifiers);
        }
        if !modifiers.is_empty() {
            // `<modifiers> ReturnType Name() { ... }`
            modifiers.push(self.name());
            modifiers.push(self.expect(SyntaxKind::Ident));
            modifiers.push(self.expect(SyntaxKind::OpenParen));
            modifiers.push(self.expect(SyntaxKind::CloseParen));
            modifiers.push(self.block());
            return Green::Node(SyntaxKind::MethodDeclaration, modifiers);
        }

        match self.peek() {
            Some(SyntaxKind::UsingKw) => {
                let mut children = vec![self.bump()];
                self.eat(SyntaxKind::StaticKw, &mut children);
                children.push(self.name());
                children.push(self.expect(SyntaxKind::Semicolon));
                Green::Node(SyntaxKind::UsingDirective, children)
            }
            Some(SyntaxKind::NamespaceKw) => {
                let children = vec![self.bump(), self.name(), self.block()];
                Green::Node(SyntaxKind::NamespaceDeclaration, children)
            }
            Some(SyntaxKind::OpenBrace) => self.block(),
            Some(SyntaxKind::ReturnKw) => {
                let children = vec![
                    self.bump(),
                    self.expr(),
                    self.expect(SyntaxKind::Semicolon),
                ];
                Green::Node(SyntaxKind::ReturnStatement, children)
            }
            _ => {
                let mut children = vec![self.expr()];
                self.eat(SyntaxKind::Semicolon, &mut children);
                Green::Node(SyntaxKind::ExpressionStatement, children)
            }
        }
    }

    /// `var x = <expr>;`
    fn local_declaration(&mut self) -> Green {
        let keyword = self.bump();
        let name = self.expect(SyntaxKind::Ident);
        let clause = Green::Node(
            SyntaxKind::EqualsValueClause,
            vec![self.bump(), self.expr()],
        );
        let children = vec![keyword, name, clause, self.expect(SyntaxKind::Semicolon)];
        Green::Node(SyntaxKind::LocalDeclaration, children)
    }

    fn block(&mut self) -> Green {
        let mut children = vec![self.expect(SyntaxKind::OpenBrace)];
        while !matches!(self.peek(), Some(SyntaxKind::CloseBrace) | None) {
            children.push(self.item());
        }
        children.push(self.expect(SyntaxKind::CloseBrace));
        Green::Node(SyntaxKind::Block, children)
    }

    fn identifier(&mut self) -> Green {
        Green::Node(
            SyntaxKind::IdentifierName,
            vec![self.expect(SyntaxKind::Ident)],
        )
    }

    fn name(&mut self) -> Green {
        let mut name = self.identifier();
        while self.peek() == Some(SyntaxKind::Dot) && self.peek_at(1) == Some(SyntaxKind::Ident) {
            let dot = self.bump();
            name = Green::Node(
                SyntaxKind::QualifiedName,
                vec![name, dot, self.identifier()],
            );
        }
        name
    }

    fn expr(&mut self) -> Green {
        match self.peek() {
            Some(SyntaxKind::NewKw) => {
                let mut children = vec![self.bump(), self.name()];
                if self.peek() == Some(SyntaxKind::OpenParen) {
                    children.push(self.arguments());
                }
                Green::Node(SyntaxKind::ObjectCreationExpression, children)
            }
            Some(SyntaxKind::Literal) => {
                Green::Node(SyntaxKind::LiteralExpression, vec![self.bump()])
            }
            Some(SyntaxKind::Ident) => {
                let mut expr = self.identifier();
                loop {
                    match self.peek() {
                        Some(SyntaxKind::Dot) => {
                            let dot = self.bump();
                            expr = Green::Node(
                                SyntaxKind::MemberAccessExpression,
                                vec![expr, dot, self.identifier()],
                            );
                        }
                        Some(SyntaxKind::OpenParen) => {
                            expr = Green::Node(
                                SyntaxKind::InvocationExpression,
                                vec![expr, self.arguments()],
                            );
                        }
                        _ => break expr,
                    }
                }
            }
            other => panic!("unexpected {other:?} at lexeme {}", self.pos),
        }
    }

    fn arguments(&mut self) -> Green {
        let mut children = vec![self.expect(SyntaxKind::OpenParen)];
        if self.peek() != Some(SyntaxKind::CloseParen) {
            loop {
                children.push(Green::Node(SyntaxKind::Argument, vec![self.expr()]));
                if self.peek() != Some(SyntaxKind::Comma) {
                    break;
                }
                children.push(self.bump());
            }
        }
        children.push(self.expect(SyntaxKind::CloseParen));
        Green::Node(SyntaxKind::ArgumentList, children)
    }

    fn flush_trivia(&self, until: usize, builder: &mut TreeBuilder, next: &mut usize) {
        while *next < until {
            let (kind, text) = &self.lexemes[*next];
            builder.trivia(*kind, text.clone());
            *next += 1;
        }
    }

    fn emit(&self, green: &Green, builder: &mut TreeBuilder, next: &mut usize) {
        match green {
            Green::Token(index) => {
                self.flush_trivia(*index, builder, next);
                let (kind, text) = &self.lexemes[*index];
                builder.token(*kind, text.clone());
                *next = index + 1;
            }
            Green::Node(kind, children) => {
                builder.start_node(*kind);
                for child in children {
                    self.emit(child, builder, next);
                }
                builder.finish_node();
            }
        }
    }
}
