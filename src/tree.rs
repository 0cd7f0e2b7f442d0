//! Arena-backed concrete syntax trees.
//!
//! A [`Tree`] owns the source text, every token (trivia included) and a
//! flat vector of nodes that refer to their children by index. Views
//! ([`Node`], [`TokenRef`]) borrow the tree and are cheap to copy.

use std::fmt;
use std::ops::Range;

use crate::token::Token;

/// Binds token and node kinds to a tree.
pub trait Language {
    type TokenKind: Copy + Eq + fmt::Debug;
    type NodeKind: Copy + Eq + fmt::Debug;

    fn is_trivia(kind: Self::TokenKind) -> bool;
    fn token_name(kind: Self::TokenKind) -> &'static str;
    fn node_name(kind: Self::NodeKind) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Node(NodeId),
    Token(TokenId),
}

#[derive(Debug, Clone)]
struct NodeData<K> {
    kind: K,
    span: Range<usize>,
    parent: Option<NodeId>,
    children: Vec<Element>,
}

pub struct Tree<L: Language> {
    text: Box<str>,
    tokens: Vec<Token<L::TokenKind>>,
    nodes: Vec<NodeData<L::NodeKind>>,
}

impl<L: Language> Tree<L> {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token<L::TokenKind>] {
        &self.tokens
    }

    /// The root node. Nodes are allocated in pre-order, so it is always
    /// the first one.
    pub fn root(&self) -> Node<'_, L> {
        Node {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn node(&self, id: NodeId) -> Node<'_, L> {
        Node { tree: self, id }
    }

    pub fn token(&self, id: TokenId) -> TokenRef<'_, L> {
        TokenRef { tree: self, id }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Indented one-line-per-element rendering, e.g.
    ///
    /// ```text
    /// FILE@0..1
    ///   CHARACTER@0..1 "a"
    /// ```
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        if !self.nodes.is_empty() {
            dump_node(self.root(), 0, &mut out);
        }
        out
    }
}

fn dump_node<L: Language>(node: Node<'_, L>, depth: usize, out: &mut String) {
    use std::fmt::Write;
    let span = node.span();
    let indent = "  ".repeat(depth);
    let _ = writeln!(
        out,
        "{indent}{}@{}..{}",
        L::node_name(node.kind()),
        span.start,
        span.end
    );
    for child in node.children() {
        match child {
            Child::Node(n) => dump_node(n, depth + 1, out),
            Child::Token(t) => {
                let span = t.span();
                let _ = writeln!(
                    out,
                    "{indent}  {}@{}..{} {:?}",
                    L::token_name(t.kind()),
                    span.start,
                    span.end,
                    t.text()
                );
            }
        }
    }
}

impl<L: Language> fmt::Debug for Tree<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_dump())
    }
}

/// Incremental construction of a [`Tree`], driven by the tree builder.
pub(crate) struct TreeSink<L: Language> {
    tree: Tree<L>,
    open: Vec<NodeId>,
    next_token: usize,
    pos: usize,
}

impl<L: Language> TreeSink<L> {
    pub(crate) fn new(text: &str, tokens: Vec<Token<L::TokenKind>>) -> Self {
        Self {
            tree: Tree {
                text: text.into(),
                tokens,
                nodes: Vec::new(),
            },
            open: Vec::new(),
            next_token: 0,
            pos: 0,
        }
    }

    pub(crate) fn start_node(&mut self, kind: L::NodeKind) {
        let id = NodeId(self.tree.nodes.len());
        let parent = self.open.last().copied();
        self.tree.nodes.push(NodeData {
            kind,
            span: self.pos..self.pos,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.tree.nodes[parent.0].children.push(Element::Node(id));
        }
        self.open.push(id);
    }

    pub(crate) fn finish_node(&mut self) {
        if let Some(id) = self.open.pop() {
            self.tree.nodes[id.0].span.end = self.pos;
        }
    }

    /// Attach the next token to the innermost open node.
    pub(crate) fn token(&mut self) {
        let Some(token) = self.tree.tokens.get(self.next_token) else {
            return;
        };
        self.pos = token.span.end;
        if let Some(parent) = self.open.last() {
            self.tree.nodes[parent.0]
                .children
                .push(Element::Token(TokenId(self.next_token)));
        }
        self.next_token += 1;
    }

    pub(crate) fn finish(mut self) -> Tree<L> {
        while !self.open.is_empty() {
            self.finish_node();
        }
        self.tree
    }
}

/// A borrowed view of one node.
pub struct Node<'t, L: Language> {
    tree: &'t Tree<L>,
    id: NodeId,
}

impl<L: Language> Clone for Node<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Language> Copy for Node<'_, L> {}

impl<L: Language> PartialEq for Node<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<L: Language> fmt::Debug for Node<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        write!(f, "{}@{}..{}", L::node_name(self.kind()), span.start, span.end)
    }
}

impl<'t, L: Language> Node<'t, L> {
    fn data(&self) -> &'t NodeData<L::NodeKind> {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> L::NodeKind {
        self.data().kind
    }

    pub fn span(&self) -> Range<usize> {
        self.data().span.clone()
    }

    pub fn text(&self) -> &'t str {
        &self.tree.text[self.data().span.clone()]
    }

    pub fn parent(&self) -> Option<Node<'t, L>> {
        let tree = self.tree;
        self.data().parent.map(|id| Node { tree, id })
    }

    pub fn children(self) -> impl Iterator<Item = Child<'t, L>> {
        let tree = self.tree;
        self.data().children.iter().map(move |e| match *e {
            Element::Node(id) => Child::Node(Node { tree, id }),
            Element::Token(id) => Child::Token(TokenRef { tree, id }),
        })
    }

    pub fn child_nodes(self) -> impl Iterator<Item = Node<'t, L>> {
        self.children().filter_map(|c| match c {
            Child::Node(n) => Some(n),
            Child::Token(_) => None,
        })
    }

    /// Direct token children, trivia included.
    pub fn child_tokens(self) -> impl Iterator<Item = TokenRef<'t, L>> {
        self.children().filter_map(|c| match c {
            Child::Token(t) => Some(t),
            Child::Node(_) => None,
        })
    }

    pub fn child_node(&self, kind: L::NodeKind) -> Option<Node<'t, L>> {
        self.child_nodes().find(|n| n.kind() == kind)
    }

    pub fn child_token(&self, kind: L::TokenKind) -> Option<TokenRef<'t, L>> {
        self.child_tokens().find(|t| t.kind() == kind)
    }

    /// This node and everything below it, in pre-order.
    pub fn descendants(self) -> impl Iterator<Item = Node<'t, L>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            let children: Vec<_> = node.child_nodes().collect();
            stack.extend(children.into_iter().rev());
            Some(node)
        })
    }
}

/// A borrowed view of one token.
pub struct TokenRef<'t, L: Language> {
    tree: &'t Tree<L>,
    id: TokenId,
}

impl<L: Language> Clone for TokenRef<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Language> Copy for TokenRef<'_, L> {}

impl<L: Language> fmt::Debug for TokenRef<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        write!(
            f,
            "{}@{}..{} {:?}",
            L::token_name(self.kind()),
            span.start,
            span.end,
            self.text()
        )
    }
}

impl<'t, L: Language> TokenRef<'t, L> {
    fn data(&self) -> &'t Token<L::TokenKind> {
        &self.tree.tokens[self.id.0]
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn kind(&self) -> L::TokenKind {
        self.data().kind
    }

    pub fn span(&self) -> Range<usize> {
        self.data().span.clone()
    }

    pub fn text(&self) -> &'t str {
        &self.tree.text[self.data().span.clone()]
    }

    pub fn is_trivia(&self) -> bool {
        L::is_trivia(self.kind())
    }
}

/// A child of a node: either a node or a token.
pub enum Child<'t, L: Language> {
    Node(Node<'t, L>),
    Token(TokenRef<'t, L>),
}

impl<L: Language> Clone for Child<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Language> Copy for Child<'_, L> {}

impl<L: Language> fmt::Debug for Child<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Node(n) => fmt::Debug::fmt(n, f),
            Child::Token(t) => fmt::Debug::fmt(t, f),
        }
    }
}

impl<'t, L: Language> Child<'t, L> {
    pub fn span(&self) -> Range<usize> {
        match self {
            Child::Node(n) => n.span(),
            Child::Token(t) => t.span(),
        }
    }

    pub fn as_node(&self) -> Option<Node<'t, L>> {
        match *self {
            Child::Node(n) => Some(n),
            Child::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<TokenRef<'t, L>> {
        match *self {
            Child::Token(t) => Some(t),
            Child::Node(_) => None,
        }
    }
}
