//! Arena-based DOM that graft can morph in place.
//!
//! Key features:
//! - **indextree Arena**: all nodes of all trees in one arena, so live and
//!   target trees can trade nodes freely
//! - **Ordered attributes**: `IndexMap` keeps serialization stable
//! - **Mutation counting**: every structural or state change is counted

use compact_str::CompactString;
use graft::{LiveTree, Morph, NodeSync, ReconcileConfig, ReconcileStats, Reconciler, TreeMut};
use indexmap::IndexMap;
use indextree::{Arena, NodeEdge, NodeError, NodeId};
use smallvec::SmallVec;

use crate::content::Content;
use crate::error::DomError;
use crate::{debug, trace};

/// Tag reported for text nodes.
pub const TEXT_TAG: &str = "#text";

/// Tag reported for comment nodes.
pub const COMMENT_TAG: &str = "#comment";

/// A forest of nodes in one arena.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Every node of every tree lives here
    pub arena: Arena<NodeData>,

    mutations: usize,
}

/// What goes in each arena slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// What this node is
    pub kind: NodeKind,
}

/// Node types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with tag, key and attributes
    Element(ElementData),
    /// Text content
    Text(CompactString),
    /// HTML comment
    Comment(CompactString),
}

/// Element data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name
    pub tag: CompactString,

    /// Identity among siblings. Never serialized.
    pub key: Option<CompactString>,

    /// Attributes, in serialization order
    pub attrs: IndexMap<CompactString, CompactString>,
}

impl NodeData {
    /// The element name, or [`TEXT_TAG`] / [`COMMENT_TAG`].
    pub fn tag(&self) -> &str {
        match &self.kind {
            NodeKind::Element(elem) => &elem.tag,
            NodeKind::Text(_) => TEXT_TAG,
            NodeKind::Comment(_) => COMMENT_TAG,
        }
    }

    /// The element's key. Text and comments have none.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(elem) => elem.key.as_deref(),
            NodeKind::Text(_) | NodeKind::Comment(_) => None,
        }
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Get mutable reference to node data
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Parent of a node, if it is attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    /// Structural and state changes made by morphing so far.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    /// Create a detached element.
    pub fn new_element(&mut self, tag: &str, key: Option<&str>) -> NodeId {
        self.arena.new_node(NodeData {
            kind: NodeKind::Element(ElementData {
                tag: tag.into(),
                key: key.map(CompactString::from),
                attrs: IndexMap::new(),
            }),
        })
    }

    /// Create a detached text node.
    pub fn new_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData {
            kind: NodeKind::Text(text.into()),
        })
    }

    /// Create a detached comment.
    pub fn new_comment(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData {
            kind: NodeKind::Comment(text.into()),
        })
    }

    /// Set an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if !self.contains(id) {
            return Err(DomError::UnknownNode);
        }
        match &mut self.get_mut(id).kind {
            NodeKind::Element(elem) => {
                elem.attrs.insert(name.into(), value.into());
                Ok(())
            }
            NodeKind::Text(_) | NodeKind::Comment(_) => Err(DomError::NotAnElement),
        }
    }

    /// Append `child` to `parent`, detaching it from wherever it was.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(DomError::UnknownNode);
        }
        if let NodeKind::Text(_) | NodeKind::Comment(_) = self.get(parent).kind {
            return Err(DomError::CannotHaveChildren {
                kind: self.get(parent).tag().to_string(),
            });
        }
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|err| match err {
                NodeError::Removed => DomError::UnknownNode,
                _ => DomError::Cycle,
            })
    }

    /// Materialise a blueprint as a new detached subtree and return its root.
    pub fn build(&mut self, content: &Content) -> NodeId {
        match content {
            Content::Element {
                tag,
                key,
                attrs,
                children,
            } => {
                let id = self.arena.new_node(NodeData {
                    kind: NodeKind::Element(ElementData {
                        tag: tag.into(),
                        key: key.as_deref().map(CompactString::from),
                        attrs: attrs
                            .iter()
                            .map(|(name, value)| (name.into(), value.into()))
                            .collect(),
                    }),
                });
                for child in children {
                    let child = self.build(child);
                    id.append(child, &mut self.arena);
                }
                id
            }
            Content::Text(text) => self.new_text(text),
            Content::Comment(text) => self.new_comment(text),
        }
    }

    /// Turn the subtree at `live` into a copy of the subtree at `target`,
    /// keeping as many live nodes as possible.
    ///
    /// Target nodes that get adopted move into the live tree; whatever is left
    /// of the target tree stays detached. When the roots are incompatible the
    /// target root takes `live`'s place under its parent, and is returned.
    pub fn morph(&mut self, live: NodeId, target: NodeId) -> Result<NodeId, DomError> {
        self.morph_with(live, target, ReconcileConfig::default())
            .map(|(root, _)| root)
    }

    /// [`Document::morph`] with a custom configuration, also returning the
    /// reconciler's counters.
    pub fn morph_with(
        &mut self,
        live: NodeId,
        target: NodeId,
        config: ReconcileConfig,
    ) -> Result<(NodeId, ReconcileStats), DomError> {
        let parent = self.parent(live);

        let mut reconciler = Reconciler::with_config(self, config);
        let morph = reconciler.reconcile(live, target)?;
        let stats = reconciler.stats();

        if let Morph::Replaced(root) = morph
            && let Some(parent) = parent
        {
            self.replace_child(parent, root, live);
        }

        debug!(?stats, mutations = self.mutations, "morph done");
        Ok((morph.node(), stats))
    }

    /// Serialize the subtree at `id` to HTML. Keys are not serialized.
    ///
    /// Void elements get no closing tag, and anything appended under one is
    /// left out.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut inside_void: Option<NodeId> = None;

        for edge in id.traverse(&self.arena) {
            match edge {
                NodeEdge::Start(_) if inside_void.is_some() => {}
                NodeEdge::Start(node) => match &self.get(node).kind {
                    NodeKind::Element(elem) => {
                        out.push('<');
                        out.push_str(&elem.tag);
                        for (name, value) in &elem.attrs {
                            out.push(' ');
                            out.push_str(name);
                            out.push_str("=\"");
                            escape_into(&mut out, value, true);
                            out.push('"');
                        }
                        out.push('>');
                        if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                            inside_void = Some(node);
                        }
                    }
                    NodeKind::Text(text) => escape_into(&mut out, text, false),
                    NodeKind::Comment(text) => {
                        out.push_str("<!--");
                        out.push_str(text);
                        out.push_str("-->");
                    }
                },
                NodeEdge::End(node) if inside_void == Some(node) => inside_void = None,
                NodeEdge::End(_) if inside_void.is_some() => {}
                NodeEdge::End(node) => {
                    if let NodeKind::Element(elem) = &self.get(node).kind {
                        out.push_str("</");
                        out.push_str(&elem.tag);
                        out.push('>');
                    }
                }
            }
        }
        out
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Write `raw` with markup characters replaced by entities. Double quotes are
/// only escaped inside attribute values.
fn escape_into(out: &mut String, raw: &str, in_attribute: bool) {
    for c in raw.chars() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' if in_attribute => "&quot;",
            _ => {
                out.push(c);
                continue;
            }
        };
        out.push_str(entity);
    }
}

impl LiveTree for Document {
    type Node = NodeId;
    type Tag = str;
    type Key = str;

    fn contains(&self, node: NodeId) -> bool {
        self.arena.get(node).is_some_and(|n| !n.is_removed())
    }

    fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(&self.arena)
    }

    fn tag(&self, node: NodeId) -> &str {
        self.get(node).tag()
    }

    fn key(&self, node: NodeId) -> Option<&str> {
        self.get(node).key()
    }
}

impl TreeMut for Document {
    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        self.mutations += 1;
        match reference {
            Some(reference) => reference.insert_before(node, &mut self.arena),
            None => parent.append(node, &mut self.arena),
        }
    }

    fn remove_child(&mut self, parent: NodeId, node: NodeId) {
        debug_assert_eq!(self.parent(node), Some(parent));
        self.mutations += 1;
        node.detach(&mut self.arena);
    }

    fn clear_children(&mut self, parent: NodeId) {
        let children: SmallVec<[NodeId; 16]> = parent.children(&self.arena).collect();
        self.mutations += children.len();
        for child in children {
            child.detach(&mut self.arena);
        }
    }
}

impl NodeSync for Document {
    fn sync(&mut self, target: NodeId, live: NodeId) {
        let wanted = self.get(target).kind.clone();
        let changed = match (wanted, &mut self.get_mut(live).kind) {
            (NodeKind::Text(wanted), NodeKind::Text(current))
            | (NodeKind::Comment(wanted), NodeKind::Comment(current)) => {
                if *current == wanted {
                    0
                } else {
                    *current = wanted;
                    1
                }
            }
            (NodeKind::Element(wanted), NodeKind::Element(current)) => {
                sync_attributes(&mut current.attrs, &wanted.attrs)
            }
            _ => 0,
        };
        if changed > 0 {
            trace!(?live, ?target, changed, "synced node state");
        }
        self.mutations += changed;
    }
}

/// Make `live` equal to `target`, order included. Returns the number of
/// attributes removed, added or changed.
fn sync_attributes(
    live: &mut IndexMap<CompactString, CompactString>,
    target: &IndexMap<CompactString, CompactString>,
) -> usize {
    let before = live.len();
    live.retain(|name, _| target.contains_key(name));
    let mut changed = before - live.len();

    for (name, value) in target {
        if live.get(name) != Some(value) {
            live.insert(name.clone(), value.clone());
            changed += 1;
        }
    }

    if !live.keys().eq(target.keys()) {
        live.sort_by(|a, _, b, _| target.get_index_of(a).cmp(&target.get_index_of(b)));
    }
    changed
}
