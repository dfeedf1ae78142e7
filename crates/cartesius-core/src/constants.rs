//! Constants for plot rendering
//!
//! All magic numbers are defined here with descriptive names and units.

use embedded_graphics::pixelcolor::Rgb888;

use crate::color::Rgba;

/// Default color of axis lines and tick marks
pub const DEFAULT_AXES_COLOR: Rgb888 = Rgb888::new(150, 150, 150);

/// Default color of tick labels
pub const DEFAULT_LABEL_COLOR: Rgb888 = Rgb888::new(150, 150, 150);

/// Default grid line color (subtle light gray)
pub const DEFAULT_GRID_COLOR: Rgb888 = Rgb888::new(235, 235, 235);

/// Default outline color of lines, graphs and circles
pub const DEFAULT_ELEMENT_COLOR: Rgb888 = Rgb888::new(0, 0, 0);

/// Background of every rendered image (opaque white)
pub const BACKGROUND_COLOR: Rgba = Rgba::new(255, 255, 255, 255);

/// Transparency mask of a fully opaque element
pub const OPAQUE: u8 = u8::MAX;

/// Default stroke width in pixels before antialiasing scale-up
pub const DEFAULT_LINE_WIDTH_PX: u32 = 1;

/// Default distance between axis ticks in user units
pub const DEFAULT_TICK_SPACING: f64 = 1.0;

/// Half length of a tick mark in pixels (ticks extend both sides of the axis)
pub const TICK_HALF_LENGTH_PX: i32 = 2;

/// Upper bound on ticks drawn per axis; spacing is widened by 10x until it fits
pub const MAX_TICKS_PER_AXIS: usize = 200;

/// Distance between a tick and its label in pixels
pub const LABEL_OFFSET_PX: i32 = 3;

/// Maximum length of formatted tick labels (characters)
pub const MAX_AXIS_LABEL_LENGTH: usize = 16;

/// Maximum decimal places printed in a tick label
pub const MAX_LABEL_PRECISION: usize = 6;

/// Default sampling step for function graphs in user units
pub const DEFAULT_FUNCTION_STEP: f64 = 0.1;

/// Upper bound on samples taken from a function graph
pub const MAX_FUNCTION_SAMPLES: usize = 1_000_000;

/// Pixels beyond the image edge that clipped segments may still reach
///
/// Keeps wide strokes whose centerline sits just outside the image visible.
pub const CLIP_MARGIN_PX: f64 = 8.0;

/// Circles whose pixel box exceeds this multiple of the image (plus clip
/// margin) are rasterized row by row over the visible rows only
pub const LARGE_SHAPE_FACTOR: f64 = 4.0;

/// Upper bound on pixels allocated for one render, after supersampling
///
/// 8192 x 8192 RGBA pixels (256 MiB per layer).
pub const MAX_RENDER_PIXELS: u64 = 8192 * 8192;
