//! Arena-backed immutable syntax tree
//!
//! Every node (branch or token) lives in an append-only arena and is
//! addressed by a [`NodeId`]. A node is never modified after allocation.
//! Editing allocates the replacement plus fresh copies of the ancestor chain
//! and moves the root pointer; all other subtrees are shared by id, so a
//! [`NodeId`] taken before an edit still names the same node afterwards as
//! long as it was not on the rewritten path.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use biome_text_size::{TextRange, TextSize};
use serde::{Deserialize, Serialize};

use super::SyntaxKind;
use super::trivia::{Trivia, trivia_len, trivia_text};
use crate::error::StaleMatch;

/// Index of a node inside a [`SyntaxTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a tree family
///
/// Assigned once when a tree is built and kept across every rewrite of that
/// tree, so node handles captured while walking stay meaningful while fixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeId(u64);

impl TreeId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Structural identity of a node: which tree family, which arena slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub tree: TreeId,
    pub node: NodeId,
}

/// Identity of the source document a tree was parsed from
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Text and boundary trivia of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    pub text: String,
    pub leading: Vec<Trivia>,
    pub trailing: Vec<Trivia>,
}

#[derive(Debug, Clone)]
enum NodeBody {
    Branch(Vec<NodeId>),
    Token(TokenData),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    kind: SyntaxKind,
    full_len: u32,
    body: NodeBody,
}

/// An immutable, lossless syntax tree for one document
///
/// A clone keeps the [`TreeId`] of its source. Clones edited independently
/// allocate different nodes under the same arena indices, so a handle taken
/// on one clone may resolve to an unrelated node on the other. Callers that
/// act on resolved handles must re-check the node, as the fix applier does
/// by re-running the matcher.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    id: TreeId,
    document: DocumentId,
    nodes: Vec<NodeEntry>,
    root: NodeId,
}

impl SyntaxTree {
    /// Empty arena; the builder allocates into it and sets the root last
    pub(crate) fn empty(document: DocumentId) -> Self {
        Self {
            id: TreeId::fresh(),
            document,
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// Tree family identity
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Source document this tree belongs to
    pub fn document(&self) -> &DocumentId {
        &self.document
    }

    /// Current root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots, including nodes no longer reachable from the root
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.entry(id).kind
    }

    pub fn is_token(&self, id: NodeId) -> bool {
        matches!(self.entry(id).body, NodeBody::Token(_))
    }

    /// Ordered children (empty for tokens)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.entry(id).body {
            NodeBody::Branch(children) => children,
            NodeBody::Token(_) => &[],
        }
    }

    /// Children that are branch nodes
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| !self.is_token(*child))
    }

    /// First direct child of the given kind
    pub fn child_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.kind(*child) == kind)
    }

    pub fn token(&self, id: NodeId) -> Option<&TokenData> {
        match &self.entry(id).body {
            NodeBody::Token(token) => Some(token),
            NodeBody::Branch(_) => None,
        }
    }

    pub fn token_text(&self, id: NodeId) -> Option<&str> {
        self.token(id).map(|token| token.text.as_str())
    }

    /// Leftmost token of a subtree
    pub fn first_token(&self, id: NodeId) -> Option<NodeId> {
        match &self.entry(id).body {
            NodeBody::Token(_) => Some(id),
            NodeBody::Branch(children) => children.iter().find_map(|c| self.first_token(*c)),
        }
    }

    /// Rightmost token of a subtree
    pub fn last_token(&self, id: NodeId) -> Option<NodeId> {
        match &self.entry(id).body {
            NodeBody::Token(_) => Some(id),
            NodeBody::Branch(children) => {
                children.iter().rev().find_map(|c| self.last_token(*c))
            }
        }
    }

    /// Length including all trivia
    pub fn full_len(&self, id: NodeId) -> TextSize {
        TextSize::from(self.entry(id).full_len)
    }

    fn leading_trivia_len(&self, id: NodeId) -> u32 {
        self.first_token(id)
            .and_then(|t| self.token(t))
            .map(|token| trivia_len(&token.leading))
            .unwrap_or(0)
    }

    fn trailing_trivia_len(&self, id: NodeId) -> u32 {
        self.last_token(id)
            .and_then(|t| self.token(t))
            .map(|token| trivia_len(&token.trailing))
            .unwrap_or(0)
    }

    /// Lossless source text of a subtree, trivia included
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::with_capacity(self.entry(id).full_len as usize);
        self.write_text(id, &mut out);
        out
    }

    fn write_text(&self, id: NodeId, out: &mut String) {
        match &self.entry(id).body {
            NodeBody::Token(token) => {
                trivia_text(&token.leading, out);
                out.push_str(&token.text);
                trivia_text(&token.trailing, out);
            }
            NodeBody::Branch(children) => {
                for child in children {
                    self.write_text(*child, out);
                }
            }
        }
    }

    /// Source text without the subtree's outer leading and trailing trivia
    pub fn trimmed_text(&self, id: NodeId) -> String {
        let full = self.text(id);
        let start = self.leading_trivia_len(id) as usize;
        let end = full.len().saturating_sub(self.trailing_trivia_len(id) as usize);
        if start >= end {
            return String::new();
        }
        full[start..end].to_string()
    }

    /// Pre-order traversal of a subtree (tokens included) with the full-span
    /// start offset of every element, given the start offset of `from`
    pub fn preorder(&self, from: NodeId, start: TextSize) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![(from, u32::from(start))],
        }
    }

    /// Pre-order branch nodes of a subtree, `from` included
    pub fn descendant_nodes(&self, from: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.preorder(from, TextSize::from(0))
            .map(|(id, _)| id)
            .filter(|id| !self.is_token(*id))
    }

    /// Trimmed span of a node whose full span starts at `offset`
    pub fn span_at(&self, id: NodeId, offset: TextSize) -> TextRange {
        let offset = u32::from(offset);
        let full_end = offset + self.entry(id).full_len;
        let start = (offset + self.leading_trivia_len(id)).min(full_end);
        let end = full_end
            .saturating_sub(self.trailing_trivia_len(id))
            .max(start);
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    /// Path from the root to `target` as `(ancestor, child index)` steps
    fn find_path(&self, from: NodeId, target: NodeId, path: &mut Vec<(NodeId, usize)>) -> bool {
        if from == target {
            return true;
        }
        for (index, child) in self.children(from).iter().enumerate() {
            path.push((from, index));
            if self.find_path(*child, target, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    fn steps_to(&self, from: NodeId, target: NodeId) -> Option<Vec<(NodeId, usize)>> {
        if target.index() >= self.nodes.len() {
            return None;
        }
        let mut path = Vec::new();
        self.find_path(from, target, &mut path).then_some(path)
    }

    /// Nodes from the root down to `target`, both ends included
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        let steps = self.steps_to(self.root, target)?;
        let mut nodes: Vec<NodeId> = steps.iter().map(|(node, _)| *node).collect();
        nodes.push(target);
        Some(nodes)
    }

    /// Whether `target` is reachable from the current root
    pub fn contains(&self, target: NodeId) -> bool {
        self.steps_to(self.root, target).is_some()
    }

    /// Full-span start offset of a reachable node
    pub fn offset_of(&self, target: NodeId) -> Option<TextSize> {
        let steps = self.steps_to(self.root, target)?;
        let offset: u32 = steps
            .iter()
            .map(|(parent, index)| {
                self.children(*parent)[..*index]
                    .iter()
                    .map(|sibling| self.entry(*sibling).full_len)
                    .sum::<u32>()
            })
            .sum();
        Some(TextSize::from(offset))
    }

    /// Span including outer trivia
    pub fn full_span(&self, target: NodeId) -> Option<TextRange> {
        let start = self.offset_of(target)?;
        Some(TextRange::at(start, self.full_len(target)))
    }

    /// Span excluding outer trivia
    pub fn span(&self, target: NodeId) -> Option<TextRange> {
        let start = self.offset_of(target)?;
        Some(self.span_at(target, start))
    }

    pub fn handle(&self, node: NodeId) -> NodeHandle {
        NodeHandle {
            tree: self.id,
            node,
        }
    }

    /// Resolve a handle captured on this tree family, if the node is still
    /// part of the current tree
    pub fn resolve(&self, handle: NodeHandle) -> Option<NodeId> {
        (handle.tree == self.id && self.contains(handle.node)).then_some(handle.node)
    }

    /// First node (pre-order) of one of `kinds` whose trimmed span is `range`
    pub fn find_by_span(&self, kinds: &[SyntaxKind], range: TextRange) -> Option<NodeId> {
        self.preorder(self.root, TextSize::from(0))
            .filter(|(id, offset)| {
                kinds.contains(&self.kind(*id))
                    && u32::from(*offset) <= u32::from(range.start())
            })
            .find(|(id, offset)| self.span_at(*id, *offset) == range)
            .map(|(id, _)| id)
    }

    // ----------------------------------------------------------------------
    // Allocation
    // ----------------------------------------------------------------------

    fn push(&mut self, entry: NodeEntry) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(entry);
        id
    }

    /// Allocate a token without trivia
    pub fn alloc_token(&mut self, kind: SyntaxKind, text: impl Into<String>) -> NodeId {
        self.alloc_token_with_trivia(kind, text, Vec::new(), Vec::new())
    }

    pub fn alloc_token_with_trivia(
        &mut self,
        kind: SyntaxKind,
        text: impl Into<String>,
        leading: Vec<Trivia>,
        trailing: Vec<Trivia>,
    ) -> NodeId {
        let token = TokenData {
            text: text.into(),
            leading,
            trailing,
        };
        let full_len =
            trivia_len(&token.leading) + token.text.len() as u32 + trivia_len(&token.trailing);
        self.push(NodeEntry {
            kind,
            full_len,
            body: NodeBody::Token(token),
        })
    }

    /// Allocate a branch node over already allocated children
    pub fn alloc_node(&mut self, kind: SyntaxKind, children: Vec<NodeId>) -> NodeId {
        let full_len = children.iter().map(|c| self.entry(*c).full_len).sum();
        self.push(NodeEntry {
            kind,
            full_len,
            body: NodeBody::Branch(children),
        })
    }

    /// Copy of a branch node with a different child list
    pub fn with_children(&mut self, node: NodeId, children: Vec<NodeId>) -> NodeId {
        let kind = self.kind(node);
        self.alloc_node(kind, children)
    }

    fn with_token_trivia(
        &mut self,
        token: NodeId,
        leading: Option<Vec<Trivia>>,
        trailing: Option<Vec<Trivia>>,
    ) -> NodeId {
        let kind = self.kind(token);
        let Some(data) = self.token(token).cloned() else {
            return token;
        };
        self.alloc_token_with_trivia(
            kind,
            data.text,
            leading.unwrap_or(data.leading),
            trailing.unwrap_or(data.trailing),
        )
    }

    /// Copy of `new` carrying the leading trivia of `old`'s first token and the
    /// trailing trivia of `old`'s last token
    pub fn with_trivia_from(&mut self, new: NodeId, old: NodeId) -> NodeId {
        let leading = self
            .first_token(old)
            .and_then(|t| self.token(t))
            .map(|t| t.leading.clone())
            .unwrap_or_default();
        let trailing = self
            .last_token(old)
            .and_then(|t| self.token(t))
            .map(|t| t.trailing.clone())
            .unwrap_or_default();

        let mut result = new;
        if let Some(first) = self.first_token(result) {
            let replacement = self.with_token_trivia(first, Some(leading), None);
            result = self
                .replace_within(result, first, replacement)
                .unwrap_or(result);
        }
        if let Some(last) = self.last_token(result) {
            let replacement = self.with_token_trivia(last, None, Some(trailing));
            result = self
                .replace_within(result, last, replacement)
                .unwrap_or(result);
        }
        result
    }

    /// Copy of `node` whose last token has no trailing trivia, plus the
    /// trivia that was removed
    pub fn split_trailing_trivia(&mut self, node: NodeId) -> (NodeId, Vec<Trivia>) {
        let Some(last) = self.last_token(node) else {
            return (node, Vec::new());
        };
        let trailing = self
            .token(last)
            .map(|t| t.trailing.clone())
            .unwrap_or_default();
        if trailing.is_empty() {
            return (node, trailing);
        }
        let bare = self.with_token_trivia(last, None, Some(Vec::new()));
        let copy = self.replace_within(node, last, bare).unwrap_or(bare);
        (copy, trailing)
    }

    /// Build a name node from dotted text: `A` becomes `IdentifierName`,
    /// `A.B.C` becomes `QualifiedName(QualifiedName(A, ., B), ., C)`
    pub fn build_name(&mut self, dotted: &str) -> NodeId {
        let mut segments = dotted.split('.');
        let first = segments.next().unwrap_or_default();
        let ident = self.alloc_token(SyntaxKind::Ident, first);
        let mut name = self.alloc_node(SyntaxKind::IdentifierName, vec![ident]);
        for segment in segments {
            let dot = self.alloc_token(SyntaxKind::Dot, ".");
            let ident = self.alloc_token(SyntaxKind::Ident, segment);
            let right = self.alloc_node(SyntaxKind::IdentifierName, vec![ident]);
            name = self.alloc_node(SyntaxKind::QualifiedName, vec![name, dot, right]);
        }
        name
    }

    /// Path-copy `ancestor` with `target` swapped for `replacement`.
    ///
    /// Returns the new copy of `ancestor`, or `None` when `target` is not in
    /// its subtree. Only the nodes on the path are reallocated.
    pub fn replace_within(
        &mut self,
        ancestor: NodeId,
        target: NodeId,
        replacement: NodeId,
    ) -> Option<NodeId> {
        self.path_copy(ancestor, target, replacement)
            .map(|(copy, _)| copy)
    }

    /// Copy of `ancestor` plus `(old, new)` for every ancestor rebuilt on the
    /// way, innermost first
    fn path_copy(
        &mut self,
        ancestor: NodeId,
        target: NodeId,
        replacement: NodeId,
    ) -> Option<(NodeId, Vec<(NodeId, NodeId)>)> {
        let steps = self.steps_to(ancestor, target)?;
        let mut copied = Vec::with_capacity(steps.len());
        let mut current = replacement;
        for (parent, index) in steps.into_iter().rev() {
            let mut children = self.children(parent).to_vec();
            children[index] = current;
            current = self.with_children(parent, children);
            copied.push((parent, current));
        }
        Some((current, copied))
    }

    /// Substitute `target` with `replacement` and move the root to the
    /// rebuilt ancestor chain
    ///
    /// Returns `(old, new)` for each rebuilt ancestor, innermost first, so
    /// ids taken before the edit can be re-pointed at their copies.
    pub fn replace(
        &mut self,
        target: NodeId,
        replacement: NodeId,
    ) -> Result<Vec<(NodeId, NodeId)>, StaleMatch> {
        let (root, copied) = self
            .path_copy(self.root, target, replacement)
            .ok_or_else(|| StaleMatch::new(format!("node {target:?} is no longer in the tree")))?;
        self.root = root;
        Ok(copied)
    }
}

/// Pre-order iterator yielding `(node, full-span start offset)`
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<(NodeId, u32)>,
}

impl Iterator for Preorder<'_> {
    type Item = (NodeId, TextSize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, offset) = self.stack.pop()?;
        let children = self.tree.children(id);
        let mut at = offset + self.tree.entry(id).full_len;
        for child in children.iter().rev() {
            at -= self.tree.entry(*child).full_len;
            self.stack.push((*child, at));
        }
        Some((id, TextSize::from(offset)))
    }
}
