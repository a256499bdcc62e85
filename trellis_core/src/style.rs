// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style properties consumed by the layout engine.
//!
//! A [`Style`] is a plain value: every property always holds a value, and new
//! nodes start from one of two immutable tables, [`Style::DEFAULT`] or
//! [`Style::WEB_DEFAULT`]. Setters for length and scalar properties validate
//! their argument against the property's domain and reject the mutation with
//! [`LayoutError::InvalidPropertyValue`] otherwise.
//!
//! # Edge resolution
//!
//! The box-model groups ([`position`](Style::position),
//! [`margin`](Style::margin), [`padding`](Style::padding),
//! [`border`](Style::border)) hold nine [`Edge`] slots. Reading a physical
//! edge consults, in order: the physical slot, the logical `Start`/`End` slot
//! mapped through the layout direction (left and right only), the
//! `Horizontal`/`Vertical` shorthand, and finally `All`.

use crate::error::LayoutError;
use crate::value::{Length, OptionalScalar};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Writing direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Use the parent's resolved direction.
    #[default]
    Inherit,
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// Resolves [`Inherit`](Self::Inherit) against the owner's direction.
    ///
    /// A root with an inherited direction lays out left to right.
    #[must_use]
    pub const fn resolve(self, owner: Self) -> Self {
        match (self, owner) {
            (Self::Inherit, Self::Inherit) => Self::Ltr,
            (Self::Inherit, owner) => owner,
            (own, _) => own,
        }
    }
}

/// Main axis of a flex container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlexDirection {
    /// Top to bottom.
    #[default]
    Column,
    /// Bottom to top.
    ColumnReverse,
    /// Inline start to inline end.
    Row,
    /// Inline end to inline start.
    RowReverse,
}

impl FlexDirection {
    /// Returns `true` for the horizontal directions.
    #[inline]
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Returns `true` for the reversed directions.
    #[inline]
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::ColumnReverse | Self::RowReverse)
    }

    /// Maps row directions through the writing direction.
    #[must_use]
    pub const fn resolve(self, direction: Direction) -> Self {
        match (self, direction) {
            (Self::Row, Direction::Rtl) => Self::RowReverse,
            (Self::RowReverse, Direction::Rtl) => Self::Row,
            (own, _) => own,
        }
    }

    /// Returns the cross axis for a resolved main axis.
    #[must_use]
    pub const fn cross(self, direction: Direction) -> Self {
        if self.is_row() {
            Self::Column
        } else {
            Self::Row.resolve(direction)
        }
    }

    /// Returns the same axis flowing the other way.
    #[must_use]
    pub(crate) const fn reversed(self) -> Self {
        match self {
            Self::Column => Self::ColumnReverse,
            Self::ColumnReverse => Self::Column,
            Self::Row => Self::RowReverse,
            Self::RowReverse => Self::Row,
        }
    }

    /// Physical edge where flow along this axis starts.
    pub(crate) const fn leading_edge(self) -> Edge {
        match self {
            Self::Column => Edge::Top,
            Self::ColumnReverse => Edge::Bottom,
            Self::Row => Edge::Left,
            Self::RowReverse => Edge::Right,
        }
    }

    /// Physical edge where flow along this axis ends.
    pub(crate) const fn trailing_edge(self) -> Edge {
        self.reversed().leading_edge()
    }

    /// The size dimension measured along this axis.
    pub(crate) const fn dimension(self) -> Dimension {
        if self.is_row() {
            Dimension::Width
        } else {
            Dimension::Height
        }
    }
}

/// Distribution of free space along the main axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Justify {
    /// Pack at the start.
    #[default]
    FlexStart,
    /// Pack around the center.
    Center,
    /// Pack at the end.
    FlexEnd,
    /// Equal gaps between items, none at the ends.
    SpaceBetween,
    /// Equal gaps around items; end gaps are half size.
    SpaceAround,
    /// Equal gaps between items and at both ends.
    SpaceEvenly,
}

/// Cross-axis alignment, used for items, individual children and lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Defer to the container (only meaningful for `align_self`).
    #[default]
    Auto,
    /// Align to the cross start.
    FlexStart,
    /// Center on the cross axis.
    Center,
    /// Align to the cross end.
    FlexEnd,
    /// Fill the line's cross size.
    Stretch,
    /// Align first baselines.
    Baseline,
    /// Lines only: equal gaps between lines.
    SpaceBetween,
    /// Lines only: equal gaps around lines.
    SpaceAround,
    /// Lines only: equal gaps between lines and at both ends.
    SpaceEvenly,
}

/// Positioning scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PositionType {
    /// In flow; position insets are ignored.
    #[default]
    Static,
    /// In flow, then offset by the position insets.
    Relative,
    /// Out of flow, placed against the parent's padding box.
    Absolute,
}

/// Line wrapping of a flex container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlexWrap {
    /// A single line.
    #[default]
    NoWrap,
    /// Wrap onto additional lines along the cross axis.
    Wrap,
    /// Wrap, stacking lines from the cross end.
    WrapReverse,
}

/// Overflow behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// Content may overflow.
    #[default]
    Visible,
    /// Overflowing content is clipped.
    Hidden,
    /// Overflowing content scrolls; children are measured unconstrained along
    /// the main axis.
    Scroll,
}

/// Whether a node takes part in layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Display {
    /// Laid out as a flex container.
    #[default]
    Flex,
    /// Removed from layout; the subtree gets a zero layout.
    None,
}

/// One of the nine slots of a box-model edge group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Physical left.
    Left,
    /// Physical top.
    Top,
    /// Physical right.
    Right,
    /// Physical bottom.
    Bottom,
    /// Inline start: left in LTR, right in RTL.
    Start,
    /// Inline end: right in LTR, left in RTL.
    End,
    /// Shorthand for left and right.
    Horizontal,
    /// Shorthand for top and bottom.
    Vertical,
    /// Shorthand for every edge.
    All,
}

impl Edge {
    /// All nine slots in storage order.
    pub const ALL: [Self; 9] = [
        Self::Left,
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Start,
        Self::End,
        Self::Horizontal,
        Self::Vertical,
        Self::All,
    ];

    const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 3,
            Self::Start => 4,
            Self::End => 5,
            Self::Horizontal => 6,
            Self::Vertical => 7,
            Self::All => 8,
        }
    }

    /// Maps `Start`/`End` to a physical edge; other slots map to themselves.
    #[must_use]
    pub const fn to_physical(self, direction: Direction) -> Self {
        match (self, direction) {
            (Self::Start, Direction::Rtl) | (Self::End, Direction::Ltr | Direction::Inherit) => {
                Self::Right
            }
            (Self::Start, _) | (Self::End, Direction::Rtl) => Self::Left,
            (own, _) => own,
        }
    }
}

/// Width or height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Horizontal extent.
    Width,
    /// Vertical extent.
    Height,
}

impl Dimension {
    const fn index(self) -> usize {
        match self {
            Self::Width => 0,
            Self::Height => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Edge and dimension groups
// ---------------------------------------------------------------------------

/// A nine-slot box-model edge group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edges([Length; 9]);

impl Edges {
    /// Every slot undefined.
    pub const UNDEFINED: Self = Self([Length::Undefined; 9]);

    /// Returns the raw value stored in `edge`.
    #[must_use]
    pub const fn get(&self, edge: Edge) -> Length {
        self.0[edge.index()]
    }

    pub(crate) const fn set(&mut self, edge: Edge, value: Length) {
        self.0[edge.index()] = value;
    }

    /// Resolves the effective value of `edge` through the shorthand chain.
    ///
    /// `Start` and `End` are first mapped to a physical edge. Returns
    /// [`Length::Undefined`] when no slot in the chain is set.
    #[must_use]
    pub fn resolve(&self, edge: Edge, direction: Direction) -> Length {
        let edge = edge.to_physical(direction);
        let own = self.get(edge);
        if !own.is_undefined() {
            return own;
        }
        let (logical, shorthand) = match edge {
            Edge::Left | Edge::Right => {
                let logical = match (edge, direction) {
                    (Edge::Left, Direction::Rtl) | (Edge::Right, Direction::Ltr | Direction::Inherit) => {
                        Edge::End
                    }
                    _ => Edge::Start,
                };
                (Some(logical), Edge::Horizontal)
            }
            Edge::Top | Edge::Bottom => (None, Edge::Vertical),
            _ => (None, Edge::All),
        };
        if let Some(logical) = logical {
            let value = self.get(logical);
            if !value.is_undefined() {
                return value;
            }
        }
        let value = self.get(shorthand);
        if !value.is_undefined() {
            return value;
        }
        self.get(Edge::All)
    }

    /// Resolves `edge` and converts it to a scalar against `reference`.
    #[must_use]
    pub fn resolve_value(
        &self,
        edge: Edge,
        direction: Direction,
        reference: OptionalScalar,
    ) -> OptionalScalar {
        self.resolve(edge, direction).resolve(reference)
    }
}

impl Default for Edges {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Which tags a length property accepts.
#[derive(Clone, Copy)]
enum LengthDomain {
    Any,
    NoAuto,
    PointsOnly,
}

fn check_length(
    property: &'static str,
    value: Length,
    domain: LengthDomain,
) -> Result<Length, LayoutError> {
    let tag_ok = match (domain, value) {
        (LengthDomain::Any, _) => true,
        (LengthDomain::NoAuto, Length::Auto) => false,
        (LengthDomain::NoAuto, _) => true,
        (LengthDomain::PointsOnly, Length::Undefined | Length::Points(_)) => true,
        (LengthDomain::PointsOnly, _) => false,
    };
    if tag_ok && value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::InvalidPropertyValue { property })
    }
}

fn check_scalar(
    property: &'static str,
    value: OptionalScalar,
) -> Result<OptionalScalar, LayoutError> {
    match value.get() {
        Some(v) if !v.is_finite() => Err(LayoutError::InvalidPropertyValue { property }),
        _ => Ok(value),
    }
}

/// Layout properties of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    direction: Direction,
    flex_direction: FlexDirection,
    justify_content: Justify,
    align_content: Align,
    align_items: Align,
    align_self: Align,
    position_type: PositionType,
    flex_wrap: FlexWrap,
    overflow: Overflow,
    display: Display,
    flex: OptionalScalar,
    flex_grow: OptionalScalar,
    flex_shrink: OptionalScalar,
    flex_basis: Length,
    aspect_ratio: OptionalScalar,
    position: Edges,
    margin: Edges,
    padding: Edges,
    border: Edges,
    dimensions: [Length; 2],
    min_dimensions: [Length; 2],
    max_dimensions: [Length; 2],
}

impl Default for Style {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Style {
    /// The default style table.
    pub const DEFAULT: Self = Self {
        direction: Direction::Inherit,
        flex_direction: FlexDirection::Column,
        justify_content: Justify::FlexStart,
        align_content: Align::FlexStart,
        align_items: Align::Stretch,
        align_self: Align::Auto,
        position_type: PositionType::Static,
        flex_wrap: FlexWrap::NoWrap,
        overflow: Overflow::Visible,
        display: Display::Flex,
        flex: OptionalScalar::UNDEFINED,
        flex_grow: OptionalScalar::UNDEFINED,
        flex_shrink: OptionalScalar::UNDEFINED,
        flex_basis: Length::Auto,
        aspect_ratio: OptionalScalar::UNDEFINED,
        position: Edges::UNDEFINED,
        margin: Edges::UNDEFINED,
        padding: Edges::UNDEFINED,
        border: Edges::UNDEFINED,
        dimensions: [Length::Auto; 2],
        min_dimensions: [Length::Undefined; 2],
        max_dimensions: [Length::Undefined; 2],
    };

    /// The style table used when [`LayoutConfig::use_web_defaults`] is set.
    ///
    /// Rows are the default main axis and lines stretch; unset shrink factors
    /// resolve to 1 instead of 0.
    ///
    /// [`LayoutConfig::use_web_defaults`]: crate::config::LayoutConfig::use_web_defaults
    pub const WEB_DEFAULT: Self = Self {
        flex_direction: FlexDirection::Row,
        align_content: Align::Stretch,
        ..Self::DEFAULT
    };

    // -- Enum properties --

    /// Returns the writing direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Sets the writing direction.
    pub const fn set_direction(&mut self, value: Direction) {
        self.direction = value;
    }

    /// Returns the main axis.
    #[must_use]
    pub const fn flex_direction(&self) -> FlexDirection {
        self.flex_direction
    }

    /// Sets the main axis.
    pub const fn set_flex_direction(&mut self, value: FlexDirection) {
        self.flex_direction = value;
    }

    /// Returns the main-axis distribution.
    #[must_use]
    pub const fn justify_content(&self) -> Justify {
        self.justify_content
    }

    /// Sets the main-axis distribution.
    pub const fn set_justify_content(&mut self, value: Justify) {
        self.justify_content = value;
    }

    /// Returns the line distribution of a wrapping container.
    #[must_use]
    pub const fn align_content(&self) -> Align {
        self.align_content
    }

    /// Sets the line distribution of a wrapping container.
    pub const fn set_align_content(&mut self, value: Align) {
        self.align_content = value;
    }

    /// Returns the default cross-axis alignment of children.
    #[must_use]
    pub const fn align_items(&self) -> Align {
        self.align_items
    }

    /// Sets the default cross-axis alignment of children.
    pub const fn set_align_items(&mut self, value: Align) {
        self.align_items = value;
    }

    /// Returns this node's cross-axis alignment override.
    #[must_use]
    pub const fn align_self(&self) -> Align {
        self.align_self
    }

    /// Sets this node's cross-axis alignment override.
    pub const fn set_align_self(&mut self, value: Align) {
        self.align_self = value;
    }

    /// Returns the positioning scheme.
    #[must_use]
    pub const fn position_type(&self) -> PositionType {
        self.position_type
    }

    /// Sets the positioning scheme.
    pub const fn set_position_type(&mut self, value: PositionType) {
        self.position_type = value;
    }

    /// Returns the wrapping mode.
    #[must_use]
    pub const fn flex_wrap(&self) -> FlexWrap {
        self.flex_wrap
    }

    /// Sets the wrapping mode.
    pub const fn set_flex_wrap(&mut self, value: FlexWrap) {
        self.flex_wrap = value;
    }

    /// Returns the overflow behaviour.
    #[must_use]
    pub const fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Sets the overflow behaviour.
    pub const fn set_overflow(&mut self, value: Overflow) {
        self.overflow = value;
    }

    /// Returns the display mode.
    #[must_use]
    pub const fn display(&self) -> Display {
        self.display
    }

    /// Sets the display mode.
    pub const fn set_display(&mut self, value: Display) {
        self.display = value;
    }

    // -- Flex factors --

    /// Returns the `flex` shorthand.
    #[must_use]
    pub const fn flex(&self) -> OptionalScalar {
        self.flex
    }

    /// Sets the `flex` shorthand.
    ///
    /// A positive value acts as a grow factor (with a zero basis outside web
    /// defaults); a negative value acts as a shrink factor. Explicit
    /// `flex_grow`, `flex_shrink` and `flex_basis` take precedence.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for infinite values.
    pub fn set_flex(&mut self, value: impl Into<OptionalScalar>) -> Result<(), LayoutError> {
        self.flex = check_scalar("flex", value.into())?;
        Ok(())
    }

    /// Returns the grow factor as set.
    #[must_use]
    pub const fn flex_grow(&self) -> OptionalScalar {
        self.flex_grow
    }

    /// Sets the grow factor.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for infinite values.
    pub fn set_flex_grow(&mut self, value: impl Into<OptionalScalar>) -> Result<(), LayoutError> {
        self.flex_grow = check_scalar("flex_grow", value.into())?;
        Ok(())
    }

    /// Returns the shrink factor as set.
    #[must_use]
    pub const fn flex_shrink(&self) -> OptionalScalar {
        self.flex_shrink
    }

    /// Sets the shrink factor.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for infinite values.
    pub fn set_flex_shrink(&mut self, value: impl Into<OptionalScalar>) -> Result<(), LayoutError> {
        self.flex_shrink = check_scalar("flex_shrink", value.into())?;
        Ok(())
    }

    /// Returns the flex basis as set.
    #[must_use]
    pub const fn flex_basis(&self) -> Length {
        self.flex_basis
    }

    /// Sets the flex basis. All four length tags are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for non-finite payloads.
    pub fn set_flex_basis(&mut self, value: Length) -> Result<(), LayoutError> {
        self.flex_basis = check_length("flex_basis", value, LengthDomain::Any)?;
        Ok(())
    }

    /// Returns the width / height ratio.
    #[must_use]
    pub const fn aspect_ratio(&self) -> OptionalScalar {
        self.aspect_ratio
    }

    /// Sets the width / height ratio. Non-positive ratios are stored but
    /// ignored by layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for infinite values.
    pub fn set_aspect_ratio(&mut self, value: impl Into<OptionalScalar>) -> Result<(), LayoutError> {
        self.aspect_ratio = check_scalar("aspect_ratio", value.into())?;
        Ok(())
    }

    // -- Edge groups --

    /// Returns the position inset stored in `edge`.
    #[must_use]
    pub const fn position(&self, edge: Edge) -> Length {
        self.position.get(edge)
    }

    /// Sets a position inset. All four length tags are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for non-finite payloads.
    pub fn set_position(&mut self, edge: Edge, value: Length) -> Result<(), LayoutError> {
        let value = check_length("position", value, LengthDomain::Any)?;
        self.position.set(edge, value);
        Ok(())
    }

    /// Returns the margin stored in `edge`.
    #[must_use]
    pub const fn margin(&self, edge: Edge) -> Length {
        self.margin.get(edge)
    }

    /// Sets a margin. `Auto` margins absorb free space.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for non-finite payloads.
    pub fn set_margin(&mut self, edge: Edge, value: Length) -> Result<(), LayoutError> {
        let value = check_length("margin", value, LengthDomain::Any)?;
        self.margin.set(edge, value);
        Ok(())
    }

    /// Returns the padding stored in `edge`.
    #[must_use]
    pub const fn padding(&self, edge: Edge) -> Length {
        self.padding.get(edge)
    }

    /// Sets a padding.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for `Auto` and for
    /// non-finite payloads.
    pub fn set_padding(&mut self, edge: Edge, value: Length) -> Result<(), LayoutError> {
        let value = check_length("padding", value, LengthDomain::NoAuto)?;
        self.padding.set(edge, value);
        Ok(())
    }

    /// Returns the border width stored in `edge`.
    #[must_use]
    pub const fn border(&self, edge: Edge) -> Length {
        self.border.get(edge)
    }

    /// Sets a border width.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for `Auto`, `Percent`
    /// and non-finite payloads.
    pub fn set_border(&mut self, edge: Edge, value: Length) -> Result<(), LayoutError> {
        let value = check_length("border", value, LengthDomain::PointsOnly)?;
        self.border.set(edge, value);
        Ok(())
    }

    /// Returns the whole position group.
    #[must_use]
    pub const fn position_edges(&self) -> &Edges {
        &self.position
    }

    /// Returns the whole margin group.
    #[must_use]
    pub const fn margin_edges(&self) -> &Edges {
        &self.margin
    }

    /// Returns the whole padding group.
    #[must_use]
    pub const fn padding_edges(&self) -> &Edges {
        &self.padding
    }

    /// Returns the whole border group.
    #[must_use]
    pub const fn border_edges(&self) -> &Edges {
        &self.border
    }

    // -- Dimensions --

    /// Returns the preferred size along `dimension`.
    #[must_use]
    pub const fn dimension(&self, dimension: Dimension) -> Length {
        self.dimensions[dimension.index()]
    }

    /// Sets the preferred size along `dimension`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for non-finite payloads.
    pub fn set_dimension(&mut self, dimension: Dimension, value: Length) -> Result<(), LayoutError> {
        self.dimensions[dimension.index()] = check_length("dimension", value, LengthDomain::Any)?;
        Ok(())
    }

    /// Returns the minimum size along `dimension`.
    #[must_use]
    pub const fn min_dimension(&self, dimension: Dimension) -> Length {
        self.min_dimensions[dimension.index()]
    }

    /// Sets the minimum size along `dimension`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for non-finite payloads.
    pub fn set_min_dimension(
        &mut self,
        dimension: Dimension,
        value: Length,
    ) -> Result<(), LayoutError> {
        self.min_dimensions[dimension.index()] =
            check_length("min_dimension", value, LengthDomain::Any)?;
        Ok(())
    }

    /// Returns the maximum size along `dimension`.
    #[must_use]
    pub const fn max_dimension(&self, dimension: Dimension) -> Length {
        self.max_dimensions[dimension.index()]
    }

    /// Sets the maximum size along `dimension`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPropertyValue`] for non-finite payloads.
    pub fn set_max_dimension(
        &mut self,
        dimension: Dimension,
        value: Length,
    ) -> Result<(), LayoutError> {
        self.max_dimensions[dimension.index()] =
            check_length("max_dimension", value, LengthDomain::Any)?;
        Ok(())
    }

    // -- Resolved values used by layout --

    /// Grow factor after applying the `flex` shorthand; never negative.
    pub(crate) fn resolved_flex_grow(&self) -> f64 {
        if let Some(grow) = self.flex_grow.get() {
            return grow.max(0.0);
        }
        match self.flex.get() {
            Some(flex) if flex > 0.0 => flex,
            _ => 0.0,
        }
    }

    /// Shrink factor after applying the `flex` shorthand; never negative.
    pub(crate) fn resolved_flex_shrink(&self, web_defaults: bool) -> f64 {
        if let Some(shrink) = self.flex_shrink.get() {
            return shrink.max(0.0);
        }
        match self.flex.get() {
            Some(flex) if !web_defaults && flex < 0.0 => -flex,
            _ if web_defaults => 1.0,
            _ => 0.0,
        }
    }

    /// Flex basis after applying the `flex` shorthand.
    pub(crate) fn resolved_flex_basis(&self, web_defaults: bool) -> Length {
        match self.flex_basis {
            Length::Auto | Length::Undefined => match self.flex.get() {
                Some(flex) if flex > 0.0 && !web_defaults => Length::ZERO,
                _ => Length::Auto,
            },
            basis => basis,
        }
    }

    /// Aspect ratio usable by layout (finite and positive).
    pub(crate) fn resolved_aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio.get().filter(|r| *r > 0.0)
    }
}
