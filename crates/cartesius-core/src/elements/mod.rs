//! Plot elements
//!
//! Every drawable item implements [`PlotElement`]: it owns its footprint in
//! user space (its private [`Bounds`]) and knows how to draw itself through a
//! [`CoordinateMapper`]. The [`Element`] enum is what a
//! [`CoordinateSystem`](crate::CoordinateSystem) stores.
//!
//! Elements whose transparency mask is not fully opaque are drawn into a
//! separate transparent layer which is then composited onto the shared image.
//! A fill and its outline therefore never blend with each other, only with
//! what was drawn before the element.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line as EgLine, PrimitiveStyle};
use log::trace;

use crate::bounds::Bounds;
use crate::color::{ElementStyle, Rgba};
use crate::constants::{CLIP_MARGIN_PX, DEFAULT_LINE_WIDTH_PX, OPAQUE};
use crate::mapper::CoordinateMapper;
use crate::raster::Raster;

mod axis;
mod circle;
mod function;
mod key_value;
mod line;
mod series;

pub use axis::{Axis, LabelPosition, Orientation};
pub use circle::Circle;
pub use function::GraphFunction;
pub use key_value::KeyValueGraph;
pub use line::Line;

/// Everything an element needs to turn user coordinates into pixels
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// Transform for the plot's aggregate bounds
    pub mapper: CoordinateMapper,
    /// Multiplier for stroke widths and pixel offsets (antialiasing factor)
    pub scale: u32,
}

impl RenderContext {
    /// Create a context; `scale` is clamped to at least 1
    pub fn new(mapper: CoordinateMapper, scale: u32) -> Self {
        Self {
            mapper,
            scale: scale.max(1),
        }
    }

    /// Stroke width in pixels after scaling
    pub fn line_width(&self) -> u32 {
        DEFAULT_LINE_WIDTH_PX * self.scale
    }

    /// Margin used when clipping segments, wide enough for scaled strokes
    fn clip_margin(&self) -> f64 {
        CLIP_MARGIN_PX * self.scale as f64
    }
}

/// Capability set shared by all plot elements
pub trait PlotElement {
    /// Footprint of the element in user space
    fn bounds(&self) -> &Bounds;

    /// Recompute the footprint from the element's geometry
    fn reload_bounds(&mut self);

    /// Colors and transparency of the element
    fn style(&self) -> &ElementStyle;

    /// Draw the element's shapes onto `target`
    fn draw<D: DrawTarget<Color = Rgba>>(
        &self,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error>;

    /// `base` with this element's transparency mask appended as alpha
    fn resolved_color(&self, base: Option<Rgb888>) -> Option<Rgba> {
        self.style().resolve(base)
    }

    /// Draw onto the shared image, through a transparent layer if needed
    fn render(&self, target: &mut Raster, ctx: &RenderContext) {
        render_layered(target, self.style().transparency_mask, |layer| {
            let Ok(()) = self.draw(layer, ctx);
        });
    }
}

/// Run `draw` directly on `target` when opaque, otherwise on a fresh
/// transparent layer that is composited onto `target` afterwards
pub(crate) fn render_layered<F>(target: &mut Raster, transparency_mask: u8, draw: F)
where
    F: FnOnce(&mut Raster),
{
    if transparency_mask == OPAQUE {
        draw(target);
    } else {
        let mut layer = Raster::transparent(target.width(), target.height());
        draw(&mut layer);
        target.composite(&layer);
    }
}

/// Draw a straight segment between two pixel-space points
///
/// The segment is clipped to the image first, so endpoints far outside the
/// visible window cost nothing.
pub(crate) fn draw_segment<D: DrawTarget<Color = Rgba>>(
    from: (f64, f64),
    to: (f64, f64),
    color: Rgba,
    ctx: &RenderContext,
    target: &mut D,
) -> Result<(), D::Error> {
    let Some((start, end)) = ctx.mapper.clip_segment(from, to, ctx.clip_margin()) else {
        return Ok(());
    };

    EgLine::new(start, end)
        .into_styled(PrimitiveStyle::with_stroke(color, ctx.line_width()))
        .draw(target)
}

/// Any element that can be added to a coordinate system
#[derive(Debug, Clone)]
pub enum Element {
    /// An axis (detached axes live in the element list)
    Axis(Axis),
    /// A straight segment
    Line(Line),
    /// A sampled function graph
    Function(GraphFunction),
    /// A circle
    Circle(Circle),
    /// A key-value series
    KeyValue(KeyValueGraph),
}

impl Element {
    /// The axis inside this element, if it is one
    pub fn as_axis(&self) -> Option<&Axis> {
        match self {
            Element::Axis(axis) => Some(axis),
            _ => None,
        }
    }

    /// Short name of the variant, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Axis(_) => "axis",
            Element::Line(_) => "line",
            Element::Function(_) => "function",
            Element::Circle(_) => "circle",
            Element::KeyValue(_) => "key-value",
        }
    }
}

impl PlotElement for Element {
    fn bounds(&self) -> &Bounds {
        match self {
            Element::Axis(e) => e.bounds(),
            Element::Line(e) => e.bounds(),
            Element::Function(e) => e.bounds(),
            Element::Circle(e) => e.bounds(),
            Element::KeyValue(e) => e.bounds(),
        }
    }

    fn reload_bounds(&mut self) {
        match self {
            Element::Axis(e) => e.reload_bounds(),
            Element::Line(e) => e.reload_bounds(),
            Element::Function(e) => e.reload_bounds(),
            Element::Circle(e) => e.reload_bounds(),
            Element::KeyValue(e) => e.reload_bounds(),
        }
    }

    fn style(&self) -> &ElementStyle {
        match self {
            Element::Axis(e) => e.style(),
            Element::Line(e) => e.style(),
            Element::Function(e) => e.style(),
            Element::Circle(e) => e.style(),
            Element::KeyValue(e) => e.style(),
        }
    }

    fn draw<D: DrawTarget<Color = Rgba>>(
        &self,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        trace!("Drawing {} element", self.kind());
        match self {
            Element::Axis(e) => e.draw(target, ctx),
            Element::Line(e) => e.draw(target, ctx),
            Element::Function(e) => e.draw(target, ctx),
            Element::Circle(e) => e.draw(target, ctx),
            Element::KeyValue(e) => e.draw(target, ctx),
        }
    }
}

impl From<Axis> for Element {
    fn from(axis: Axis) -> Self {
        Element::Axis(axis)
    }
}

impl From<Line> for Element {
    fn from(line: Line) -> Self {
        Element::Line(line)
    }
}

impl From<GraphFunction> for Element {
    fn from(function: GraphFunction) -> Self {
        Element::Function(function)
    }
}

impl From<Circle> for Element {
    fn from(circle: Circle) -> Self {
        Element::Circle(circle)
    }
}

impl From<KeyValueGraph> for Element {
    fn from(graph: KeyValueGraph) -> Self {
        Element::KeyValue(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BACKGROUND_COLOR;

    fn ctx(w: u32, h: u32) -> RenderContext {
        let bounds = Bounds::UNIT.with_image_size(w, h);
        RenderContext::new(CoordinateMapper::new(&bounds).unwrap(), 1)
    }

    #[test]
    fn test_opaque_element_draws_directly() {
        let line = Line::new((-1.0, 0.0), (1.0, 0.0));
        let mut image = Raster::new(20, 20, BACKGROUND_COLOR);
        line.render(&mut image, &ctx(20, 20));

        assert_eq!(image.pixel(5, 10), Some(Rgba::new(0, 0, 0, 255)));
    }

    #[test]
    fn test_transparent_element_is_composited() {
        let style = ElementStyle::stroke(Rgb888::new(0, 0, 0)).with_transparency(128);
        let line = Line::new((-1.0, 0.0), (1.0, 0.0)).with_style(style);
        let mut image = Raster::new(20, 20, BACKGROUND_COLOR);
        line.render(&mut image, &ctx(20, 20));

        let pixel = image.pixel(5, 10).unwrap();
        assert_eq!(pixel.a, 255, "Composite onto opaque background stays opaque");
        assert!(
            pixel.r > 100 && pixel.r < 160,
            "Expected blended gray, got {pixel:?}"
        );
        assert_eq!(image.pixel(5, 2), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_render_layered_skips_layer_when_opaque() {
        let mut image = Raster::new(2, 2, BACKGROUND_COLOR);
        let mut direct = false;
        render_layered(&mut image, OPAQUE, |target| {
            direct = target.pixel(0, 0) == Some(BACKGROUND_COLOR);
        });
        assert!(direct, "Opaque drawing must see the shared image");

        let mut layered = false;
        render_layered(&mut image, 10, |target| {
            layered = target.pixel(0, 0) == Some(Rgba::TRANSPARENT);
        });
        assert!(layered, "Transparent drawing must get an empty layer");
    }

    #[test]
    fn test_element_dispatch() {
        let element: Element = Circle::new(1.0, 1.0, 0.5).unwrap().into();
        assert_eq!(element.kind(), "circle");
        assert!(element.as_axis().is_none());
        assert_eq!(element.bounds().left(), Some(0.5));
    }
}
