//! JSON fixture format and tree construction.
//!
//! Fixtures describe a box tree with kebab-case property names mirroring
//! the CSS properties they stand for. All values are already-resolved:
//! numbers are pixels, strings are keywords or percentages.

use flexkit_layout::{LayoutTree, NodeId};
use flexkit_style::{
    AlignContent, AlignItems, AlignSelf, ComputedStyle, FlexBasis, FlexDirection, FlexWrap,
    JustifyContent, Length, Position, Visibility,
};
use serde::Deserialize;

use crate::TestError;

/// A complete fixture document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FixtureDoc {
    #[serde(default)]
    pub name: Option<String>,
    pub viewport: Viewport,
    pub root: BoxSpec,
}

/// Available space handed to the fixture's root box.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// A length value: a number is pixels; strings are `"auto"` or `"NN%"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LengthSpec {
    Number(f32),
    Keyword(String),
}

impl LengthSpec {
    fn to_length(&self) -> Result<Length, TestError> {
        match self {
            LengthSpec::Number(px) => Ok(Length::Px(*px)),
            LengthSpec::Keyword(word) if word == "auto" => Ok(Length::Auto),
            LengthSpec::Keyword(word) => parse_percent(word).map(Length::Percent),
        }
    }

    fn to_basis(&self) -> Result<FlexBasis, TestError> {
        match self {
            LengthSpec::Number(px) => Ok(FlexBasis::Length(*px)),
            LengthSpec::Keyword(word) if word == "auto" => Ok(FlexBasis::Auto),
            LengthSpec::Keyword(word) if word == "content" => Ok(FlexBasis::Content),
            LengthSpec::Keyword(word) => parse_percent(word).map(FlexBasis::Percent),
        }
    }
}

fn parse_percent(word: &str) -> Result<f32, TestError> {
    let digits = word
        .strip_suffix('%')
        .ok_or_else(|| TestError::InvalidFormat(format!("unknown length keyword: {word}")))?;
    digits
        .parse::<f32>()
        .map_err(|_| TestError::InvalidFormat(format!("bad percentage: {word}")))
}

macro_rules! spec_enum {
    ($spec:ident => $target:ident { $($variant:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, Default, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $spec {
            #[default]
            Unset,
            $($variant),+
        }

        impl $spec {
            fn resolve(self) -> $target {
                match self {
                    $spec::Unset => $target::default(),
                    $($spec::$variant => $target::$variant),+
                }
            }
        }
    };
}

spec_enum!(DirectionSpec => FlexDirection { Row, RowReverse, Column, ColumnReverse });
spec_enum!(WrapSpec => FlexWrap { NoWrap, Wrap, WrapReverse });
spec_enum!(JustifySpec => JustifyContent {
    FlexStart, FlexEnd, Center, SpaceBetween, SpaceAround, SpaceEvenly,
});
spec_enum!(AlignItemsSpec => AlignItems { Stretch, FlexStart, FlexEnd, Center, Baseline });
spec_enum!(AlignContentSpec => AlignContent {
    FlexStart, FlexEnd, Center, SpaceBetween, SpaceAround, SpaceEvenly, Stretch,
});
spec_enum!(AlignSelfSpec => AlignSelf { Auto, FlexStart, FlexEnd, Center, Baseline, Stretch });
spec_enum!(PositionSpec => Position { Static, Relative, Absolute, Fixed });
spec_enum!(VisibilitySpec => Visibility { Visible, Hidden });

/// One box in a fixture tree.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BoxSpec {
    pub direction: DirectionSpec,
    pub wrap: WrapSpec,
    pub justify_content: JustifySpec,
    pub align_items: AlignItemsSpec,
    pub align_content: AlignContentSpec,
    pub gap: Option<LengthSpec>,
    pub row_gap: Option<LengthSpec>,
    pub column_gap: Option<LengthSpec>,

    pub width: Option<LengthSpec>,
    pub height: Option<LengthSpec>,
    pub min_width: Option<LengthSpec>,
    pub min_height: Option<LengthSpec>,
    pub max_width: Option<LengthSpec>,
    pub max_height: Option<LengthSpec>,

    /// Margins as `[top, right, bottom, left]`.
    pub margin: Option<[f32; 4]>,

    pub grow: f32,
    pub shrink: Option<f32>,
    pub basis: Option<LengthSpec>,
    pub order: i32,
    pub align_self: AlignSelfSpec,
    pub position: PositionSpec,
    pub visibility: VisibilitySpec,
    pub aspect_ratio: Option<f32>,

    pub text: Option<String>,
    pub children: Vec<BoxSpec>,
}

impl BoxSpec {
    fn to_style(&self) -> Result<ComputedStyle, TestError> {
        let mut style = ComputedStyle::new();

        style.flex_direction = self.direction.resolve();
        style.flex_wrap = self.wrap.resolve();
        style.justify_content = self.justify_content.resolve();
        style.align_items = self.align_items.resolve();
        style.align_content = self.align_content.resolve();
        if let Some(gap) = &self.gap {
            style.set_gap(gap.to_length()?);
        }
        if let Some(gap) = &self.row_gap {
            style.row_gap = gap.to_length()?;
        }
        if let Some(gap) = &self.column_gap {
            style.column_gap = gap.to_length()?;
        }

        if let Some(width) = &self.width {
            style.width = width.to_length()?;
        }
        if let Some(height) = &self.height {
            style.height = height.to_length()?;
        }
        if let Some(min_width) = &self.min_width {
            style.min_width = min_width.to_length()?;
        }
        if let Some(min_height) = &self.min_height {
            style.min_height = min_height.to_length()?;
        }
        if let Some(max_width) = &self.max_width {
            style.max_width = max_width.to_length()?;
        }
        if let Some(max_height) = &self.max_height {
            style.max_height = max_height.to_length()?;
        }

        if let Some([top, right, bottom, left]) = self.margin {
            style.margin_top = Length::Px(top);
            style.margin_right = Length::Px(right);
            style.margin_bottom = Length::Px(bottom);
            style.margin_left = Length::Px(left);
        }

        style.flex_grow = self.grow;
        style.flex_shrink = self.shrink.unwrap_or(1.0);
        if let Some(basis) = &self.basis {
            style.flex_basis = basis.to_basis()?;
        }
        style.order = self.order;
        style.align_self = self.align_self.resolve();
        style.position = self.position.resolve();
        style.visibility = self.visibility.resolve();
        style.aspect_ratio = self.aspect_ratio;

        Ok(style)
    }
}

/// Build a layout tree from a fixture root spec.
pub fn build_tree(spec: &BoxSpec) -> Result<(LayoutTree, NodeId), TestError> {
    let mut tree = LayoutTree::new();
    let root = build_box(&mut tree, spec)?;
    Ok((tree, root))
}

fn build_box(tree: &mut LayoutTree, spec: &BoxSpec) -> Result<NodeId, TestError> {
    let style = spec.to_style()?;
    let id = match &spec.text {
        Some(text) => tree.new_text_node(style, text.clone()),
        None => tree.new_node(style),
    };
    for child in &spec.children {
        let child_id = build_box(tree, child)?;
        tree.append_child(id, child_id);
    }
    Ok(id)
}
