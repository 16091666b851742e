use crate::fixed;
use crate::graphics::texture::Texture;

/// One textured screen column, plotted top to bottom (both ends
/// inclusive). `top_u` picks the tile column; `top_v` advances by
/// `delta_v` per row.
#[derive(Clone, Copy)]
pub struct VerticalStripe<'a> {
    pub x: i32,
    pub top: i32,
    pub bottom: i32,
    pub top_u: i32,
    pub top_v: fixed::Value,
    pub delta_v: fixed::Value,
    pub texture: &'a Texture,
    pub shade_amount: i32,
}

/// One textured screen row, plotted left to right (both ends inclusive).
/// U and V advance independently per column.
#[derive(Clone, Copy)]
pub struct HorizontalStripe<'a> {
    pub y: i32,
    pub left: i32,
    pub right: i32,
    pub left_u: fixed::Value,
    pub left_v: fixed::Value,
    pub delta_u: fixed::Value,
    pub delta_v: fixed::Value,
    pub texture: &'a Texture,
    pub shade_amount: i32,
}

/// A stripe of either orientation; callers that just forward draws can
/// stay agnostic of which rasterization path produced it.
#[derive(Clone, Copy)]
pub enum Stripe<'a> {
    Vertical(VerticalStripe<'a>),
    Horizontal(HorizontalStripe<'a>),
}
