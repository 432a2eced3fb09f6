//! # FlexKit Layout
//!
//! Flexible-box layout engine for FlexKit.
//! Computes the position and size of every box in a tree, bottom-up.
//!
//! ## Design Goals
//!
//! 1. **Arena-backed tree**: boxes live in one arena and refer to each
//!    other by id; no raw pointer links, no manual destruction
//! 2. **Dirty-flag memoization**: a layout pass skips clean subtrees
//! 3. **Pluggable measurement**: leaf content is sized through the
//!    [`Measure`] capability, never by the engine itself
//! 4. **Always terminates with geometry**: invalid numeric input clamps
//!    instead of failing
//!
//! ## Usage
//!
//! ```
//! use flexkit_layout::{Constraints, FixedMeasure, LayoutContext, LayoutTree};
//! use flexkit_style::{ComputedStyle, Length};
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.new_node(ComputedStyle::new());
//! tree.set_constraints(root, Constraints::exact(800.0, 600.0));
//!
//! let mut child_style = ComputedStyle::new();
//! child_style.width = Length::Px(200.0);
//! child_style.height = Length::Px(100.0);
//! let child = tree.new_node(child_style);
//! tree.append_child(root, child);
//!
//! let measure = FixedMeasure::default();
//! tree.layout(root, &LayoutContext::new(&measure));
//!
//! let geometry = tree.get(child).unwrap().geometry;
//! assert_eq!(geometry.width, 200.0);
//! ```

pub mod flex;
pub mod geometry;
pub mod measure;
pub mod tree;

pub use flex::{is_align_supported, Axis};
pub use geometry::{EdgeSizes, Point, Rect, Size};
pub use measure::{FixedMeasure, HeuristicTextMeasure, Measure, MeasureRequest};
pub use tree::{BoxContent, BoxNode, Constraints, LayoutContext, LayoutTree, NodeId, SourceId};
