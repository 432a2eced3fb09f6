//! Flexbox container algorithm.
//!
//! The multi-phase pipeline run for every flex container:
//! 1. Determine main/cross axes from flex-direction
//! 2. Collect in-flow, visible items and sort by `order`
//! 3. Resolve flex base sizes, clamped to min/max
//! 4. Collect items into flex lines (if wrapping)
//! 5. Resolve flexible lengths (grow/shrink)
//! 6. Place lines on the cross axis (align-content)
//! 7. Main axis alignment (justify-content)
//! 8. Cross axis alignment (align-items, align-self)
//! 9. Write geometry back into the arena

use flexkit_style::{
    sanitize_factor, sanitize_px, AlignContent, AlignItems, AlignSelf, ComputedStyle, FlexBasis,
    FlexWrap, JustifyContent, Length, Visibility,
};
use tracing::{debug, trace};

use crate::geometry::{EdgeSizes, Rect};
use crate::tree::{Constraints, LayoutTree, NodeId};

/// Represents the main and cross axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Get the perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Whether an alignment value is fully supported.
///
/// `baseline` falls back to start behavior; callers that need real
/// baseline alignment can query this instead of discovering the gap from
/// the geometry.
pub fn is_align_supported(align: AlignItems) -> bool {
    !matches!(align, AlignItems::Baseline)
}

/// A flex item during layout computation.
#[derive(Debug)]
struct FlexItem {
    /// The box this item positions.
    node: NodeId,

    /// Order property for sorting.
    order: i32,

    /// Flex grow factor.
    grow: f32,

    /// Flex shrink factor.
    shrink: f32,

    /// Resolved base main size (clamped).
    base_main_size: f32,

    /// Main size after flex resolution.
    target_main_size: f32,

    /// Cross size.
    cross_size: f32,

    /// Whether the cross size came from content rather than explicit style;
    /// only such items may be stretched.
    cross_is_auto: bool,

    /// Main position (relative to container).
    main_position: f32,

    /// Cross position (relative to line start).
    cross_position: f32,

    min_main: f32,
    max_main: f32,
    min_cross: f32,
    max_cross: f32,

    align_self: AlignSelf,

    main_margin_start: f32,
    main_margin_end: f32,
    cross_margin_start: f32,
    cross_margin_end: f32,
}

impl FlexItem {
    /// Outer base main size (base + margins).
    fn outer_base_main(&self) -> f32 {
        self.base_main_size + self.main_margin_start + self.main_margin_end
    }

    /// Outer main size (target + margins).
    fn outer_main_size(&self) -> f32 {
        self.target_main_size + self.main_margin_start + self.main_margin_end
    }

    /// Outer cross size (cross + margins).
    fn outer_cross_size(&self) -> f32 {
        self.cross_size + self.cross_margin_start + self.cross_margin_end
    }
}

/// A flex line containing one or more items.
#[derive(Debug, Default)]
struct FlexLine {
    items: Vec<FlexItem>,
    cross_size: f32,
    cross_position: f32,
}

impl FlexLine {
    fn new() -> Self {
        Self::default()
    }

    /// Largest outer cross size among items.
    fn max_outer_cross(&self) -> f32 {
        self.items
            .iter()
            .map(FlexItem::outer_cross_size)
            .fold(0.0, f32::max)
    }
}

fn constraint_on(constraints: Constraints, axis: Axis) -> Option<f32> {
    match axis {
        Axis::Horizontal => constraints.width,
        Axis::Vertical => constraints.height,
    }
}

fn style_size_on(style: &ComputedStyle, axis: Axis) -> Length {
    match axis {
        Axis::Horizontal => style.width,
        Axis::Vertical => style.height,
    }
}

/// Resolve a minimum constraint; auto means no minimum.
pub(crate) fn resolve_min(length: Length, base: f32) -> f32 {
    length.resolve(base).unwrap_or(0.0)
}

/// Resolve a maximum constraint; auto or a resolved value of zero or less
/// means "no maximum".
pub(crate) fn resolve_max(length: Length, base: f32) -> f32 {
    match length.resolve(base) {
        Some(max) if max > 0.0 => max,
        _ => f32::INFINITY,
    }
}

/// Clamp a size to the `[min, max]` range of an axis.
pub(crate) fn clamp_axis(value: f32, min: Length, max: Length, base: f32) -> f32 {
    value.max(resolve_min(min, base)).min(resolve_max(max, base))
}

/// Lay out a flex container's children and resolve its own size.
pub(crate) fn layout_container(tree: &mut LayoutTree, container: NodeId) {
    let Some(node) = tree.get(container) else {
        return;
    };
    let style = node.style.clone();
    let constraints = node.constraints;

    // 1. Determine main/cross axes
    let direction = style.flex_direction;
    let main_axis = if direction.is_row() {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };
    let cross_axis = main_axis.cross();

    // Available space per axis: explicit style size wins, else the
    // caller's constraint. Percentages resolve against the same base;
    // an indefinite base resolves them to zero.
    let avail_main = constraint_on(constraints, main_axis);
    let avail_cross = constraint_on(constraints, cross_axis);
    let known_main = style_size_on(&style, main_axis)
        .resolve(avail_main.unwrap_or(0.0))
        .or(avail_main);
    let known_cross = style_size_on(&style, cross_axis)
        .resolve(avail_cross.unwrap_or(0.0))
        .or(avail_cross);

    let pct_main = known_main.unwrap_or(0.0);
    let pct_cross = known_cross.unwrap_or(0.0);
    let main_gap = style.main_gap(direction, pct_main);
    let cross_gap = style.cross_gap(direction, pct_cross);

    // 2-3. Collect items, sort by order, resolve base sizes
    let mut items = prepare_items(tree, container, main_axis, pct_main, pct_cross);
    items.sort_by_key(|item| item.order);

    // A container with no definite main size fits its content.
    let container_main = known_main.unwrap_or_else(|| {
        let total: f32 = items.iter().map(FlexItem::outer_base_main).sum();
        total + main_gap * items.len().saturating_sub(1) as f32
    });

    // 4. Collect items into flex lines
    let mut lines = collect_lines(items, container_main, main_gap, style.flex_wrap);

    debug!(
        container = container.index(),
        lines = lines.len(),
        main = container_main,
        "flex container"
    );

    // 5. Resolve flexible lengths per line
    for line in &mut lines {
        resolve_flexible_lengths(line, container_main, main_gap);
    }

    // A single non-wrapping line spans the container's cross size;
    // wrapped lines are sized by their content.
    let single_line = style.flex_wrap == FlexWrap::NoWrap;
    for line in &mut lines {
        line.cross_size = if single_line {
            known_cross.unwrap_or_else(|| line.max_outer_cross())
        } else {
            line.max_outer_cross()
        };
    }

    let container_cross = known_cross.unwrap_or_else(|| {
        lines.iter().map(|l| l.cross_size).sum::<f32>()
            + cross_gap * lines.len().saturating_sub(1) as f32
    });

    // 6. Place lines on the cross axis
    place_lines(
        &mut lines,
        container_cross,
        cross_gap,
        style.align_content,
        style.flex_wrap == FlexWrap::WrapReverse,
    );

    // 7-8. Place items within each line
    for line in &mut lines {
        place_main_axis(
            line,
            container_main,
            main_gap,
            style.justify_content,
            direction.is_reverse(),
        );
        place_cross_axis(line, style.align_items);
    }

    // 9. Write geometry back
    apply_geometry(tree, &lines, main_axis);

    if let Some(node) = tree.get_mut(container) {
        let (width, height) = match main_axis {
            Axis::Horizontal => (container_main, container_cross),
            Axis::Vertical => (container_cross, container_main),
        };
        node.geometry.width = width;
        node.geometry.height = height;
    }
}

/// Collect the container's in-flow, visible children as flex items with
/// resolved base sizes.
fn prepare_items(
    tree: &LayoutTree,
    container: NodeId,
    main_axis: Axis,
    pct_main: f32,
    pct_cross: f32,
) -> Vec<FlexItem> {
    let mut items = Vec::new();

    for child_id in tree.children(container) {
        let Some(child) = tree.get(child_id) else {
            continue;
        };
        let style = &child.style;

        // Out-of-flow boxes keep their default geometry; hidden boxes stay
        // in the tree but take no space.
        if style.position.is_out_of_flow() || style.visibility == Visibility::Hidden {
            continue;
        }

        let (main_margin_start, main_margin_end, cross_margin_start, cross_margin_end) =
            match main_axis {
                Axis::Horizontal => (
                    style.margin_left.resolve_or(pct_main, 0.0),
                    style.margin_right.resolve_or(pct_main, 0.0),
                    style.margin_top.resolve_or(pct_cross, 0.0),
                    style.margin_bottom.resolve_or(pct_cross, 0.0),
                ),
                Axis::Vertical => (
                    style.margin_top.resolve_or(pct_main, 0.0),
                    style.margin_bottom.resolve_or(pct_main, 0.0),
                    style.margin_left.resolve_or(pct_cross, 0.0),
                    style.margin_right.resolve_or(pct_cross, 0.0),
                ),
            };

        let style_main = style_size_on(style, main_axis);
        let style_cross = style_size_on(style, main_axis.cross());
        let (laid_main, laid_cross) = match main_axis {
            Axis::Horizontal => (child.geometry.width, child.geometry.height),
            Axis::Vertical => (child.geometry.height, child.geometry.width),
        };

        // Base main size: a non-auto flex-basis wins; otherwise the item's
        // own main size, either explicit style size or the size the child
        // resolved bottom-up (its own layout or the measurer).
        let base_main = match style.flex_basis {
            FlexBasis::Length(px) => sanitize_px(px),
            FlexBasis::Percent(pct) => sanitize_px(pct / 100.0 * pct_main),
            FlexBasis::Content => laid_main,
            FlexBasis::Auto => style_main.resolve(pct_main).unwrap_or(laid_main),
        };

        let cross_is_auto = style_cross.is_auto();
        let cross = style_cross.resolve(pct_cross).unwrap_or(laid_cross);

        let (min_main, max_main, min_cross, max_cross) = match main_axis {
            Axis::Horizontal => (
                resolve_min(style.min_width, pct_main),
                resolve_max(style.max_width, pct_main),
                resolve_min(style.min_height, pct_cross),
                resolve_max(style.max_height, pct_cross),
            ),
            Axis::Vertical => (
                resolve_min(style.min_height, pct_main),
                resolve_max(style.max_height, pct_main),
                resolve_min(style.min_width, pct_cross),
                resolve_max(style.max_width, pct_cross),
            ),
        };

        let base_main = base_main.max(min_main).min(max_main);
        let cross_size = cross.max(min_cross).min(max_cross);

        items.push(FlexItem {
            node: child_id,
            order: style.order,
            grow: sanitize_factor(style.flex_grow),
            shrink: sanitize_factor(style.flex_shrink),
            base_main_size: base_main,
            target_main_size: base_main,
            cross_size,
            cross_is_auto,
            main_position: 0.0,
            cross_position: 0.0,
            min_main,
            max_main,
            min_cross,
            max_cross,
            align_self: style.align_self,
            main_margin_start,
            main_margin_end,
            cross_margin_start,
            cross_margin_end,
        });
    }

    items
}

/// Collect items into flex lines based on the wrap property.
fn collect_lines(
    mut items: Vec<FlexItem>,
    container_main: f32,
    main_gap: f32,
    wrap: FlexWrap,
) -> Vec<FlexLine> {
    if items.is_empty() {
        return Vec::new();
    }

    if wrap == FlexWrap::NoWrap {
        let mut line = FlexLine::new();
        line.items = items;
        return vec![line];
    }

    // Greedy accumulation; an oversized item still gets a line of its own.
    // Gaps count between items, never before the first item of a line.
    let mut lines = Vec::new();
    let mut current_line = FlexLine::new();
    let mut line_main_size = 0.0f32;

    for item in items.drain(..) {
        let item_size = item.outer_base_main();

        if !current_line.items.is_empty()
            && line_main_size + main_gap + item_size > container_main
        {
            lines.push(current_line);
            current_line = FlexLine::new();
            line_main_size = 0.0;
        }

        if !current_line.items.is_empty() {
            line_main_size += main_gap;
        }
        line_main_size += item_size;
        current_line.items.push(item);
    }

    if !current_line.items.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Resolve flexible lengths (grow/shrink) for a line.
///
/// A single distribution pass: each item receives its proportional share
/// and is then re-clamped to its min/max. Space reclaimed by a clamp is
/// not redistributed to the remaining flexible items, a deliberate
/// divergence from the iterative CSS freeze-and-redistribute loop.
fn resolve_flexible_lengths(line: &mut FlexLine, container_main: f32, main_gap: f32) {
    if line.items.is_empty() {
        return;
    }

    let total_gaps = main_gap * (line.items.len() - 1) as f32;
    let used_space: f32 = line.items.iter().map(FlexItem::outer_base_main).sum();
    let free_space = container_main - used_space - total_gaps;

    if free_space > 0.0 {
        let total_grow: f32 = line.items.iter().map(|i| i.grow).sum();
        if total_grow <= 0.0 {
            return;
        }
        for item in &mut line.items {
            let share = free_space * item.grow / total_grow;
            item.target_main_size = (item.base_main_size + share)
                .max(item.min_main)
                .min(item.max_main);
        }
    } else if free_space < 0.0 {
        let total_shrink: f32 = line.items.iter().map(|i| i.shrink).sum();
        if total_shrink <= 0.0 {
            return;
        }
        for item in &mut line.items {
            let share = -free_space * item.shrink / total_shrink;
            item.target_main_size = (item.base_main_size - share)
                .max(0.0)
                .max(item.min_main)
                .min(item.max_main);
        }
    }
}

/// Place lines on the cross axis according to align-content.
///
/// `Stretch` grows every line equally to fill the container. For the
/// space-* family the distributed spacing replaces the gap between lines.
/// Wrap-reverse assigns bands in reverse line order.
fn place_lines(
    lines: &mut [FlexLine],
    container_cross: f32,
    cross_gap: f32,
    align_content: AlignContent,
    wrap_reverse: bool,
) {
    if lines.is_empty() {
        return;
    }

    let count = lines.len();
    let total_gaps = cross_gap * (count - 1) as f32;

    if align_content == AlignContent::Stretch {
        let total: f32 = lines.iter().map(|l| l.cross_size).sum();
        let free_space = container_cross - total - total_gaps;
        if free_space > 0.0 {
            let extra = free_space / count as f32;
            for line in lines.iter_mut() {
                line.cross_size += extra;
            }
        }
    }

    let total: f32 = lines.iter().map(|l| l.cross_size).sum();
    let free_space = container_cross - total - total_gaps;

    let (initial_offset, spacing) = match align_content {
        AlignContent::FlexStart | AlignContent::Stretch => (0.0, cross_gap),
        AlignContent::FlexEnd => (free_space, cross_gap),
        AlignContent::Center => (free_space / 2.0, cross_gap),
        AlignContent::SpaceBetween => {
            if count > 1 {
                (0.0, free_space / (count - 1) as f32)
            } else {
                (0.0, cross_gap)
            }
        }
        AlignContent::SpaceAround => {
            let space = free_space / count as f32;
            (space / 2.0, space)
        }
        AlignContent::SpaceEvenly => {
            let space = free_space / (count + 1) as f32;
            (space, space)
        }
    };

    let mut cross_pos = initial_offset;
    if wrap_reverse {
        for line in lines.iter_mut().rev() {
            line.cross_position = cross_pos;
            cross_pos += line.cross_size + spacing;
        }
    } else {
        for line in lines.iter_mut() {
            line.cross_position = cross_pos;
            cross_pos += line.cross_size + spacing;
        }
    }
}

/// Place items along the main axis according to justify-content.
///
/// For the space-* family the distributed spacing replaces the gap as the
/// inter-item advance; the gap still participates in the remaining-space
/// computation.
fn place_main_axis(
    line: &mut FlexLine,
    container_main: f32,
    main_gap: f32,
    justify: JustifyContent,
    reverse: bool,
) {
    if line.items.is_empty() {
        return;
    }

    let count = line.items.len();
    let total_items: f32 = line.items.iter().map(FlexItem::outer_main_size).sum();
    let total_gaps = main_gap * (count - 1) as f32;
    let remaining = (container_main - total_items - total_gaps).max(0.0);

    let (initial_offset, spacing) = match justify {
        JustifyContent::FlexStart => (0.0, main_gap),
        JustifyContent::FlexEnd => (remaining, main_gap),
        JustifyContent::Center => (remaining / 2.0, main_gap),
        JustifyContent::SpaceBetween => {
            if count > 1 {
                (0.0, remaining / (count - 1) as f32)
            } else {
                (0.0, main_gap)
            }
        }
        JustifyContent::SpaceAround => {
            let space = remaining / count as f32;
            (space / 2.0, space)
        }
        JustifyContent::SpaceEvenly => {
            let space = remaining / (count + 1) as f32;
            (space, space)
        }
    };

    trace!(count, remaining, "placing line on main axis");

    let mut pos = initial_offset;
    if reverse {
        for item in line.items.iter_mut().rev() {
            item.main_position = pos + item.main_margin_start;
            pos += item.outer_main_size() + spacing;
        }
    } else {
        for item in line.items.iter_mut() {
            item.main_position = pos + item.main_margin_start;
            pos += item.outer_main_size() + spacing;
        }
    }
}

/// Align items on the cross axis within their line.
fn place_cross_axis(line: &mut FlexLine, align_items: AlignItems) {
    let line_cross = line.cross_size;
    for item in &mut line.items {
        let align = item.align_self.resolve(align_items);

        // Stretch fills the line but never overrides an explicit cross size.
        if align == AlignItems::Stretch && item.cross_is_auto {
            let stretched = line_cross - item.cross_margin_start - item.cross_margin_end;
            item.cross_size = stretched
                .max(item.min_cross)
                .min(item.max_cross)
                .max(0.0);
        }

        let free = (line_cross - item.outer_cross_size()).max(0.0);
        item.cross_position = match align {
            // Baseline metrics are unavailable at this layer; align to start.
            AlignItems::FlexStart | AlignItems::Baseline | AlignItems::Stretch => {
                item.cross_margin_start
            }
            AlignItems::FlexEnd => free + item.cross_margin_start,
            AlignItems::Center => free / 2.0 + item.cross_margin_start,
        };
    }
}

/// Write computed positions and sizes back into the arena.
fn apply_geometry(tree: &mut LayoutTree, lines: &[FlexLine], main_axis: Axis) {
    for line in lines {
        for item in &line.items {
            let (x, y, width, height) = match main_axis {
                Axis::Horizontal => (
                    item.main_position,
                    line.cross_position + item.cross_position,
                    item.target_main_size,
                    item.cross_size,
                ),
                Axis::Vertical => (
                    line.cross_position + item.cross_position,
                    item.main_position,
                    item.cross_size,
                    item.target_main_size,
                ),
            };
            if let Some(node) = tree.get_mut(item.node) {
                node.geometry = Rect::new(x, y, width, height);
                node.margin = match main_axis {
                    Axis::Horizontal => EdgeSizes {
                        left: item.main_margin_start,
                        right: item.main_margin_end,
                        top: item.cross_margin_start,
                        bottom: item.cross_margin_end,
                    },
                    Axis::Vertical => EdgeSizes {
                        top: item.main_margin_start,
                        bottom: item.main_margin_end,
                        left: item.cross_margin_start,
                        right: item.cross_margin_end,
                    },
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedMeasure;
    use crate::tree::LayoutContext;

    fn item_style(width: f32, height: f32) -> ComputedStyle {
        let mut style = ComputedStyle::new();
        style.width = Length::Px(width);
        style.height = Length::Px(height);
        style
    }

    fn layout(tree: &mut LayoutTree, root: NodeId) {
        let measure = FixedMeasure::new(0.0, 0.0);
        let ctx = LayoutContext::new(&measure);
        tree.layout(root, &ctx);
    }

    #[test]
    fn test_axis_cross() {
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Axis::Vertical.cross(), Axis::Horizontal);
    }

    #[test]
    fn test_align_support_query() {
        assert!(is_align_supported(AlignItems::Center));
        assert!(!is_align_supported(AlignItems::Baseline));
    }

    #[test]
    fn test_resolve_max_zero_is_unbounded() {
        assert_eq!(resolve_max(Length::Px(0.0), 100.0), f32::INFINITY);
        assert_eq!(resolve_max(Length::Auto, 100.0), f32::INFINITY);
        assert_eq!(resolve_max(Length::Px(80.0), 100.0), 80.0);
    }

    #[test]
    fn test_order_sorting_is_stable() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node(ComputedStyle::new());
        tree.set_constraints(root, Constraints::exact(400.0, 100.0));

        let mut first = item_style(50.0, 10.0);
        first.order = 1;
        let mut second = item_style(50.0, 10.0);
        second.order = 0;
        let mut third = item_style(50.0, 10.0);
        third.order = 1;

        let a = tree.new_node(first);
        let b = tree.new_node(second);
        let c = tree.new_node(third);
        tree.append_child(root, a);
        tree.append_child(root, b);
        tree.append_child(root, c);

        layout(&mut tree, root);

        // b (order 0) first, then a and c keep sibling order.
        assert_eq!(tree.get(b).unwrap().geometry.x, 0.0);
        assert_eq!(tree.get(a).unwrap().geometry.x, 50.0);
        assert_eq!(tree.get(c).unwrap().geometry.x, 100.0);
    }

    #[test]
    fn test_hidden_and_absolute_children_are_skipped() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node(ComputedStyle::new());
        tree.set_constraints(root, Constraints::exact(400.0, 100.0));

        let mut hidden = item_style(50.0, 10.0);
        hidden.visibility = Visibility::Hidden;
        let mut absolute = item_style(50.0, 10.0);
        absolute.position = flexkit_style::Position::Absolute;
        let visible = item_style(50.0, 10.0);

        let h = tree.new_node(hidden);
        let a = tree.new_node(absolute);
        let v = tree.new_node(visible);
        tree.append_child(root, h);
        tree.append_child(root, a);
        tree.append_child(root, v);

        layout(&mut tree, root);

        // The visible item starts at the origin; skipped boxes keep theirs.
        assert_eq!(tree.get(v).unwrap().geometry.x, 0.0);
        assert_eq!(tree.get(h).unwrap().geometry.x, 0.0);
        assert_eq!(tree.get(a).unwrap().geometry.x, 0.0);
    }

    #[test]
    fn test_content_sized_container() {
        let mut tree = LayoutTree::new();
        let mut style = ComputedStyle::new();
        style.set_gap(Length::Px(10.0));
        let root = tree.new_node(style);

        let a = tree.new_node(item_style(100.0, 40.0));
        let b = tree.new_node(item_style(60.0, 30.0));
        tree.append_child(root, a);
        tree.append_child(root, b);

        layout(&mut tree, root);

        let geom = tree.get(root).unwrap().geometry;
        assert_eq!(geom.width, 170.0);
        assert_eq!(geom.height, 40.0);
    }

    #[test]
    fn test_degenerate_container_is_zero_extent() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node(ComputedStyle::new());
        let child = tree.new_node(ComputedStyle::new());
        tree.append_child(root, child);

        layout(&mut tree, root);

        let geom = tree.get(root).unwrap().geometry;
        assert_eq!((geom.width, geom.height), (0.0, 0.0));
    }
}
