//! Layout tree: the arena-backed box tree and the recursive layout driver.
//!
//! Boxes live in a single arena and refer to each other by [`NodeId`];
//! children are id lists owned by the arena. The driver walks the tree
//! post-order so a child's final size is available before its parent
//! resolves flex bases, and skips any subtree whose root is clean.

use flexkit_style::{sanitize_px, sanitize_ratio, ComputedStyle};
use tracing::{debug, trace};

use crate::flex;
use crate::geometry::{EdgeSizes, Rect, Size};
use crate::measure::{Measure, MeasureRequest};

/// A handle into the layout arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Opaque id of the external style/DOM node a box was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

/// Content carried by a box, handed to [`Measure`] for leaves.
#[derive(Debug, Clone, Default)]
pub enum BoxContent {
    /// An element box; a leaf element measures as empty unless the
    /// measurer knows better through its source id.
    #[default]
    Element,
    /// A run of text.
    Text(String),
}

/// Available space handed to a box, per axis. `None` is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Constraints {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl Constraints {
    /// No constraint on either axis.
    pub fn none() -> Self {
        Self::default()
    }

    /// Fixed available space on both axes.
    pub fn exact(width: f32, height: f32) -> Self {
        Self {
            width: Some(sanitize_px(width)),
            height: Some(sanitize_px(height)),
        }
    }
}

/// A single box in the layout tree.
#[derive(Debug)]
pub struct BoxNode {
    /// Resolved style, supplied by the style collaborator.
    pub style: ComputedStyle,
    /// Leaf content.
    pub content: BoxContent,
    /// Opaque back-reference to the external node.
    pub source: Option<SourceId>,
    /// Available space for this box. Usually only set on the root;
    /// children receive space from their container.
    pub constraints: Constraints,
    /// Resolved geometry, in the parent's coordinate space.
    pub geometry: Rect,
    /// Resolved margins, in pixels.
    pub margin: EdgeSizes,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    dirty: bool,
}

impl BoxNode {
    fn new(style: ComputedStyle, content: BoxContent) -> Self {
        Self {
            style,
            content,
            source: None,
            constraints: Constraints::none(),
            geometry: Rect::zero(),
            margin: EdgeSizes::default(),
            children: Vec::new(),
            parent: None,
            dirty: true,
        }
    }

    /// Text content, for text leaves.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            BoxContent::Text(text) => Some(text),
            BoxContent::Element => None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Per-call layout context.
///
/// Passed down the call chain instead of living in global state; carries
/// the measurement capability for leaves.
pub struct LayoutContext<'a> {
    pub measure: &'a dyn Measure,
}

impl<'a> LayoutContext<'a> {
    pub fn new(measure: &'a dyn Measure) -> Self {
        Self { measure }
    }
}

/// The complete layout tree.
#[derive(Debug, Default)]
pub struct LayoutTree {
    nodes: Vec<BoxNode>,
}

impl LayoutTree {
    /// Create an empty layout tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new element box and return its id.
    pub fn new_node(&mut self, style: ComputedStyle) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(BoxNode::new(style, BoxContent::Element));
        id
    }

    /// Allocate a new text leaf and return its id.
    pub fn new_text_node(&mut self, style: ComputedStyle, text: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(BoxNode::new(style, BoxContent::Text(text.into())));
        id
    }

    /// Number of boxes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a reference to a box.
    pub fn get(&self, id: NodeId) -> Option<&BoxNode> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a box.
    ///
    /// Does not touch the dirty flag; use the `set_*` methods for
    /// mutations that must invalidate layout.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut BoxNode> {
        self.nodes.get_mut(id.0)
    }

    /// Add a child to a parent box and invalidate the parent chain.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child {
            debug!(?parent, "ignoring attempt to parent a box to itself");
            return;
        }
        match self.nodes.get(child.0).map(|n| n.parent) {
            Some(None) => {}
            Some(Some(_)) => {
                debug!(?child, "ignoring append of a box that already has a parent");
                return;
            }
            None => return,
        }
        if let Some(child_node) = self.nodes.get_mut(child.0) {
            child_node.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            parent_node.children.push(child);
        }
        self.mark_dirty(parent);
    }

    /// Children of a box, in tree order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Replace a box's style and invalidate it.
    pub fn set_style(&mut self, id: NodeId, style: ComputedStyle) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.style = style;
        }
        self.mark_dirty(id);
    }

    /// Replace a box's constraints and invalidate it.
    pub fn set_constraints(&mut self, id: NodeId, constraints: Constraints) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.constraints = constraints;
        }
        self.mark_dirty(id);
    }

    /// Attach the external source id to a box.
    pub fn set_source(&mut self, id: NodeId, source: SourceId) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.source = Some(source);
        }
    }

    /// Mark a box and its ancestor chain as needing layout.
    pub fn mark_dirty(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get_mut(node_id.0) {
                Some(node) => {
                    if node.dirty {
                        // Ancestors of a dirty box are already dirty.
                        break;
                    }
                    node.dirty = true;
                    current = node.parent;
                }
                None => break,
            }
        }
    }

    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.dirty)
    }

    /// Lay out the subtree rooted at `root`.
    ///
    /// A no-op for clean subtrees. Children are laid out before parents so
    /// auto flex bases can read their final sizes; every visited box ends
    /// clean. Synchronous and single-tree; the caller must not mutate the
    /// tree while a pass is in progress.
    pub fn layout(&mut self, root: NodeId, ctx: &LayoutContext<'_>) {
        trace!(root = root.0, boxes = self.nodes.len(), "layout pass");
        self.layout_node(root, ctx);
    }

    fn layout_node(&mut self, id: NodeId, ctx: &LayoutContext<'_>) {
        let Some(node) = self.get(id) else { return };
        if !node.dirty {
            return;
        }

        let children = self.children(id);
        for &child in &children {
            self.layout_node(child, ctx);
        }

        if children.is_empty() {
            self.size_leaf(id, ctx);
        } else {
            flex::layout_container(self, id);
        }

        if let Some(node) = self.get_mut(id) {
            node.dirty = false;
        }
    }

    /// Size a leaf from explicit style, aspect ratio, or the measurer.
    fn size_leaf(&mut self, id: NodeId, ctx: &LayoutContext<'_>) {
        let (width, height) = {
            let Some(node) = self.get(id) else { return };
            let style = &node.style;
            let avail_width = node.constraints.width;
            let avail_height = node.constraints.height;

            let mut width = style.width.resolve(avail_width.unwrap_or(0.0));
            let mut height = style.height.resolve(avail_height.unwrap_or(0.0));
            let ratio = sanitize_ratio(style.aspect_ratio);

            // One explicit axis plus a ratio fixes the other axis.
            if height.is_none() {
                if let (Some(r), Some(w)) = (ratio, width) {
                    height = Some(w / r);
                }
            }
            if width.is_none() {
                if let (Some(r), Some(h)) = (ratio, height) {
                    width = Some(h * r);
                }
            }

            if width.is_none() || height.is_none() {
                let request = MeasureRequest {
                    text: node.text(),
                    style,
                    source: node.source,
                };
                let available = Size::new(
                    avail_width.unwrap_or(f32::INFINITY),
                    avail_height.unwrap_or(f32::INFINITY),
                );
                let measured = ctx.measure.measure(&request, available);
                trace!(
                    node = id.0,
                    width = measured.width,
                    height = measured.height,
                    "measured leaf"
                );
                if width.is_none() {
                    width = Some(sanitize_px(measured.width));
                }
                if height.is_none() {
                    height = Some(sanitize_px(measured.height));
                }
            }

            let width = flex::clamp_axis(
                width.unwrap_or(0.0),
                style.min_width,
                style.max_width,
                avail_width.unwrap_or(0.0),
            );
            let height = flex::clamp_axis(
                height.unwrap_or(0.0),
                style.min_height,
                style.max_height,
                avail_height.unwrap_or(0.0),
            );
            (width, height)
        };

        if let Some(node) = self.get_mut(id) {
            node.geometry.width = width;
            node.geometry.height = height;
        }
    }
}
