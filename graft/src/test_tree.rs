//! A small Vec-backed tree used by the unit tests.
//!
//! Trees are written in a compact notation: `tag#key=value(child child)`,
//! where the key, the value and the child list are all optional.

use core::iter::Peekable;
use core::str::Chars;

use crate::tree::{LiveTree, NodeSync, TreeMut};

#[derive(Debug, Clone)]
struct TestNode {
    tag: String,
    key: Option<String>,
    value: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct TestTree {
    nodes: Vec<TestNode>,
    /// Structural mutations (inserts and removals) performed by the
    /// reconciler.
    pub(crate) mutations: usize,
    /// Calls to [`NodeSync::sync`].
    pub(crate) syncs: usize,
}

impl TestTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Build a detached tree from the compact notation and return its root.
    pub(crate) fn parse(&mut self, src: &str) -> usize {
        let mut chars = src.chars().peekable();
        self.parse_node(&mut chars)
    }

    fn parse_node(&mut self, chars: &mut Peekable<Chars<'_>>) -> usize {
        skip_whitespace(chars);
        let tag = ident(chars);
        assert!(!tag.is_empty(), "expected a tag");
        let key = (chars.next_if_eq(&'#').is_some()).then(|| ident(chars));
        let value = if chars.next_if_eq(&'=').is_some() {
            ident(chars)
        } else {
            String::new()
        };

        let id = self.nodes.len();
        self.nodes.push(TestNode {
            tag,
            key,
            value,
            parent: None,
            children: Vec::new(),
        });

        if chars.next_if_eq(&'(').is_some() {
            loop {
                skip_whitespace(chars);
                if chars.next_if_eq(&')').is_some() {
                    break;
                }
                let child = self.parse_node(chars);
                self.nodes[child].parent = Some(id);
                self.nodes[id].children.push(child);
            }
        }
        id
    }

    /// Render the subtree at `node` back into the compact notation.
    pub(crate) fn render(&self, node: usize) -> String {
        let data = &self.nodes[node];
        let mut out = data.tag.clone();
        if let Some(key) = &data.key {
            out.push('#');
            out.push_str(key);
        }
        if !data.value.is_empty() {
            out.push('=');
            out.push_str(&data.value);
        }
        if !data.children.is_empty() {
            let children: Vec<_> = data.children.iter().map(|&c| self.render(c)).collect();
            out.push('(');
            out.push_str(&children.join(" "));
            out.push(')');
        }
        out
    }

    pub(crate) fn child_vec(&self, node: usize) -> Vec<usize> {
        self.nodes[node].children.clone()
    }

    pub(crate) fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    fn detach(&mut self, node: usize) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(c) = chars.next_if(|&c| c.is_alphanumeric() || c == '_' || c == '-') {
        out.push(c);
    }
    out
}

impl LiveTree for TestTree {
    type Node = usize;
    type Tag = str;
    type Key = str;

    fn contains(&self, node: usize) -> bool {
        node < self.nodes.len()
    }

    fn children(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes[node].children.iter().copied()
    }

    fn tag(&self, node: usize) -> &str {
        &self.nodes[node].tag
    }

    fn key(&self, node: usize) -> Option<&str> {
        self.nodes[node].key.as_deref()
    }
}

impl TreeMut for TestTree {
    fn insert_before(&mut self, parent: usize, node: usize, reference: Option<usize>) {
        self.mutations += 1;
        self.detach(node);
        let siblings = &mut self.nodes[parent].children;
        let at = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(at, node);
        self.nodes[node].parent = Some(parent);
    }

    fn remove_child(&mut self, parent: usize, node: usize) {
        self.mutations += 1;
        assert_eq!(self.nodes[node].parent, Some(parent), "not a child of {parent}");
        self.detach(node);
    }
}

impl NodeSync for TestTree {
    fn sync(&mut self, target: usize, live: usize) {
        self.syncs += 1;
        if self.nodes[live].value != self.nodes[target].value {
            self.nodes[live].value = self.nodes[target].value.clone();
        }
    }
}
