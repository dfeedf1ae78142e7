//! The coordinate system: element collection, aggregate bounds and rendering

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::constants::{BACKGROUND_COLOR, MAX_RENDER_PIXELS};
use crate::elements::{Axis, Element, Orientation, PlotElement, RenderContext};
use crate::mapper::CoordinateMapper;
use crate::raster::Raster;
use crate::{CartesiusError, CartesiusResult};

/// Options for a single [`CoordinateSystem::render`] call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Recompute the bounds before aspect correction so one user unit has
    /// the same pixel length on both axes
    pub axis_units_equal_length: bool,
    /// Skip drawing the x-axis (and its grid)
    pub hide_x_axis: bool,
    /// Skip drawing the y-axis (and its grid)
    pub hide_y_axis: bool,
    /// Supersampling factor; must be finite and greater than 1 when set
    pub antialiasing_factor: Option<f64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            axis_units_equal_length: true,
            hide_x_axis: false,
            hide_y_axis: false,
            antialiasing_factor: None,
        }
    }
}

impl RenderOptions {
    /// Supersample by `factor` and downsample to the requested size
    pub fn with_antialiasing(mut self, factor: f64) -> Self {
        self.antialiasing_factor = Some(factor);
        self
    }

    /// Toggle aspect correction of auto-resized bounds
    pub fn with_axis_units_equal_length(mut self, enabled: bool) -> Self {
        self.axis_units_equal_length = enabled;
        self
    }

    /// Hide or show the x-axis
    pub fn with_hidden_x_axis(mut self, hidden: bool) -> Self {
        self.hide_x_axis = hidden;
        self
    }

    /// Hide or show the y-axis
    pub fn with_hidden_y_axis(mut self, hidden: bool) -> Self {
        self.hide_y_axis = hidden;
        self
    }

    /// Reject an antialiasing factor that is not finite or not above 1
    pub fn validate(&self) -> CartesiusResult<()> {
        match self.antialiasing_factor {
            Some(factor) if !(factor.is_finite() && factor > 1.0) => {
                Err(CartesiusError::configuration(format!(
                    "antialiasing factor must be finite and greater than 1, got {factor}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Internal render size and stroke scale for a requested output size
    ///
    /// Fails when the internal image would exceed [`MAX_RENDER_PIXELS`].
    fn supersampled(&self, width: u32, height: u32) -> CartesiusResult<(u32, u32, u32)> {
        let factor = self.antialiasing_factor.unwrap_or(1.0);
        let scaled = |v: u32| (v as f64 * factor).round();
        let (w, h) = (scaled(width), scaled(height));

        if w * h > MAX_RENDER_PIXELS as f64 {
            return Err(CartesiusError::configuration(format!(
                "{width}x{height} at antialiasing factor {factor} exceeds {MAX_RENDER_PIXELS} pixels"
            )));
        }

        Ok((w as u32, h as u32, factor.round().max(1.0) as u32))
    }
}

/// A plot: an x-axis, a y-axis and an ordered list of elements
///
/// In auto-resize mode (the default) the bounds grow to fit every element
/// and are widened at render time to match the image's aspect ratio. Bounds
/// given through [`CoordinateSystem::with_bounds`] are used as-is.
#[derive(Debug, Clone)]
pub struct CoordinateSystem {
    elements: Vec<Element>,
    x_axis: Axis,
    y_axis: Axis,
    bounds: Bounds,
    resize_bounds: bool,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateSystem {
    /// Empty auto-resizing plot showing `[-1, 1] x [-1, 1]`
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            x_axis: Axis::default_for(Orientation::Horizontal),
            y_axis: Axis::default_for(Orientation::Vertical),
            bounds: Bounds::UNIT,
            resize_bounds: true,
        }
    }

    /// Plot with fixed bounds that never resize
    ///
    /// Fails unless all four edges are set with a positive extent.
    pub fn with_bounds(bounds: Bounds) -> CartesiusResult<Self> {
        bounds.width_height()?;

        Ok(Self {
            bounds,
            resize_bounds: false,
            ..Self::new()
        })
    }

    /// Plot fixed to `[left, right] x [bottom, top]`
    pub fn with_extent(left: f64, right: f64, bottom: f64, top: f64) -> CartesiusResult<Self> {
        Self::with_bounds(Bounds::new(left, right, bottom, top)?)
    }

    /// Add an element
    ///
    /// A non-detached [`Axis`] replaces the x-axis or y-axis depending on
    /// its orientation. Everything else is appended to the element list.
    pub fn add(&mut self, element: impl Into<Element>) {
        match element.into() {
            Element::Axis(axis) if !axis.is_detached() => match axis.orientation() {
                Orientation::Horizontal => self.x_axis = axis,
                Orientation::Vertical => self.y_axis = axis,
            },
            mut element => {
                element.reload_bounds();
                self.elements.push(element);
                self.reload_bounds();
            }
        }
    }

    /// Remove every element, keeping the axes
    pub fn clear(&mut self) {
        self.elements.clear();
        self.reload_bounds();
    }

    /// Elements in drawing order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The horizontal slot axis
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// The vertical slot axis
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// Current bounds, including the image size of the last render
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Whether the bounds follow the elements
    pub fn is_resizable(&self) -> bool {
        self.resize_bounds
    }

    /// Recompute the bounds as the union of every element's bounds
    ///
    /// Does nothing for fixed bounds. Falls back to `[-1, 1] x [-1, 1]` when
    /// no element has a footprint.
    pub fn reload_bounds(&mut self) {
        if !self.resize_bounds {
            return;
        }

        let union = self
            .elements
            .iter()
            .fold(self.bounds.reset(), |bounds, element| {
                bounds.union(element.bounds())
            });

        self.bounds = if union.is_set() {
            union
        } else {
            match self.bounds.image_size() {
                Some((w, h)) => Bounds::UNIT.with_image_size(w, h),
                None => Bounds::UNIT,
            }
        };
        debug!("Reloaded bounds over {} elements: {}", self.elements.len(), self.bounds);
    }

    /// Render the plot to a `width` x `height` RGBA raster
    ///
    /// Grid lines go first, then elements in insertion order, then the
    /// x-axis and the y-axis. Fails on a zero image size, invalid options or
    /// bounds with zero extent.
    pub fn render(
        &mut self,
        width: u32,
        height: u32,
        options: &RenderOptions,
    ) -> CartesiusResult<Raster> {
        if width == 0 || height == 0 {
            return Err(CartesiusError::configuration(format!(
                "image size must be non-zero, got {width}x{height}"
            )));
        }
        options.validate()?;

        let (pixel_width, pixel_height, scale) = options.supersampled(width, height)?;
        self.bounds = self.bounds.with_image_size(pixel_width, pixel_height);

        if options.axis_units_equal_length {
            self.reload_bounds();
        }

        let mut image = Raster::new(pixel_width, pixel_height, BACKGROUND_COLOR);

        if self.resize_bounds {
            self.bounds = self.bounds.update_to_image_size()?;
            debug!("Aspect-corrected bounds: {}", self.bounds);
        }

        let ctx = RenderContext::new(CoordinateMapper::new(&self.bounds)?, scale);
        debug!(
            "Rendering {} elements at {}x{} (scale {})",
            self.elements.len(),
            pixel_width,
            pixel_height,
            scale
        );

        for axis in self.visible_axes(options) {
            axis.render_grid(&mut image, &ctx);
        }

        for element in &self.elements {
            element.render(&mut image, &ctx);
        }

        if !options.hide_x_axis {
            self.x_axis.render(&mut image, &ctx);
        }
        if !options.hide_y_axis {
            self.y_axis.render(&mut image, &ctx);
        }

        if image.size() != (width, height) {
            image = image.downsample(width, height);
        }

        Ok(image)
    }

    /// Visible slot axes followed by detached axes, in drawing order
    fn visible_axes<'a>(&'a self, options: &RenderOptions) -> impl Iterator<Item = &'a Axis> {
        let x_axis = (!options.hide_x_axis).then_some(&self.x_axis);
        let y_axis = (!options.hide_y_axis).then_some(&self.y_axis);

        x_axis
            .into_iter()
            .chain(y_axis)
            .chain(self.elements.iter().filter_map(Element::as_axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ElementStyle, Rgba};
    use crate::constants::DEFAULT_AXES_COLOR;
    use crate::elements::{Circle, GraphFunction, Line};
    use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

    fn edges(bounds: &Bounds) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
        (bounds.left(), bounds.right(), bounds.bottom(), bounds.top())
    }

    fn unit_edges() -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
        edges(&Bounds::UNIT)
    }

    #[test]
    fn test_empty_system_draws_axes_through_center() {
        let mut system = CoordinateSystem::new();
        let image = system.render(100, 100, &RenderOptions::default()).unwrap();
        let axis = Some(Rgba::from(DEFAULT_AXES_COLOR));

        assert_eq!(image.size(), (100, 100));
        assert!(
            (49..=51).any(|y| image.pixel(10, y) == axis),
            "x-axis must cross row 50"
        );
        assert!(
            (49..=51).any(|x| image.pixel(x, 10) == axis),
            "y-axis must cross column 50"
        );
        assert_eq!(image.pixel(10, 10), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_hidden_axes_leave_white_image() {
        let mut system = CoordinateSystem::new();
        let options = RenderOptions::default()
            .with_hidden_x_axis(true)
            .with_hidden_y_axis(true);
        let image = system.render(30, 20, &options).unwrap();

        assert!(image.pixels().iter().all(|p| *p == BACKGROUND_COLOR));
    }

    #[test]
    fn test_circle_alone_has_unit_bounds() {
        let mut system = CoordinateSystem::new();
        system.add(Circle::new(0.0, 0.0, 1.0).unwrap());
        assert_eq!(edges(system.bounds()), unit_edges());
    }

    #[test]
    fn test_bounds_grow_with_elements() {
        let mut system = CoordinateSystem::new();
        system.add(Line::new((0.0, 0.0), (4.0, 1.0)));
        system.add(Circle::new(-1.0, 2.0, 0.5).unwrap());

        assert_eq!(
            edges(system.bounds()),
            (Some(-1.5), Some(4.0), Some(0.0), Some(2.5))
        );
    }

    #[test]
    fn test_clear_resets_to_unit() {
        let mut system = CoordinateSystem::new();
        system.add(Circle::new(5.0, 5.0, 1.0).unwrap());
        system.clear();
        system.reload_bounds();

        assert!(system.elements().is_empty());
        assert_eq!(edges(system.bounds()), unit_edges());
    }

    #[test]
    fn test_axis_replaces_slot_but_detached_is_appended() {
        let mut system = CoordinateSystem::new();
        system.add(Axis::horizontal().with_ticks(2.0).unwrap());
        system.add(Axis::vertical().without_ticks());

        assert!(system.elements().is_empty(), "Slot axes are not elements");
        assert_eq!(system.x_axis().tick_spacing(), Some(2.0));
        assert_eq!(system.y_axis().tick_spacing(), None);

        system.add(Axis::detached(Orientation::Horizontal, 0.5).unwrap());
        assert_eq!(system.elements().len(), 1);
        assert!(system.elements()[0].as_axis().is_some());
        assert_eq!(system.x_axis().tick_spacing(), Some(2.0));
        assert_eq!(
            edges(system.bounds()),
            unit_edges(),
            "Detached axes contribute no bounds"
        );
    }

    #[test]
    fn test_aspect_correction_widens_short_side() {
        let mut system = CoordinateSystem::new();
        system.add(Circle::new(0.0, 0.0, 1.0).unwrap());
        system.render(200, 100, &RenderOptions::default()).unwrap();

        let bounds = system.bounds();
        assert_eq!(edges(bounds), (Some(-2.0), Some(2.0), Some(-1.0), Some(1.0)));
        assert_eq!(bounds.image_size(), Some((200, 100)));
    }

    #[test]
    fn test_fixed_bounds_are_not_corrected() {
        let mut system = CoordinateSystem::with_extent(0.0, 10.0, 0.0, 5.0).unwrap();
        system.add(Circle::new(50.0, 50.0, 1.0).unwrap());
        system.render(100, 100, &RenderOptions::default()).unwrap();

        assert!(!system.is_resizable());
        assert_eq!(
            edges(system.bounds()),
            (Some(0.0), Some(10.0), Some(0.0), Some(5.0))
        );
        assert!(CoordinateSystem::with_bounds(Bounds::EMPTY).is_err());
    }

    #[test]
    fn test_degenerate_bounds_fail_at_render() {
        let mut system = CoordinateSystem::new();
        system.add(Line::new((0.0, 1.0), (3.0, 1.0)));

        assert!(matches!(
            system.render(50, 50, &RenderOptions::default()),
            Err(CartesiusError::Precondition { .. })
        ));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let mut system = CoordinateSystem::new();

        for options in [
            RenderOptions::default().with_antialiasing(1.0),
            RenderOptions::default().with_antialiasing(0.5),
            RenderOptions::default().with_antialiasing(f64::NAN),
        ] {
            assert!(matches!(
                system.render(10, 10, &options),
                Err(CartesiusError::Configuration { .. })
            ));
        }
        assert!(system.render(0, 10, &RenderOptions::default()).is_err());
    }

    #[test]
    fn test_antialiasing_keeps_requested_size() {
        let mut system = CoordinateSystem::new();
        system.add(GraphFunction::new(f64::sin, -3.0, 3.0, 0.05).unwrap());

        let options = RenderOptions::default().with_antialiasing(3.0);
        let image = system.render(120, 80, &options).unwrap();

        assert_eq!(image.size(), (120, 80));
        assert_eq!(system.bounds().image_size(), Some((360, 240)));
        assert!(
            image
                .pixels()
                .iter()
                .any(|p| p.r == p.g && p.r > 0 && p.r < 255 && p.r != DEFAULT_AXES_COLOR.r()),
            "Downsampled edges must produce intermediate grays"
        );
    }

    #[test]
    fn test_transparent_fill_blends_with_earlier_elements() {
        let mut system = CoordinateSystem::new();
        system.add(
            Circle::new(0.0, 0.0, 1.0)
                .unwrap()
                .with_style(ElementStyle::default().with_fill(Some(Rgb888::new(255, 0, 0)))),
        );
        system.add(
            Circle::new(0.0, 0.0, 0.5).unwrap().with_style(
                ElementStyle::default()
                    .with_color(None)
                    .with_fill(Some(Rgb888::new(0, 0, 255)))
                    .with_transparency(128),
            ),
        );

        let options = RenderOptions::default()
            .with_hidden_x_axis(true)
            .with_hidden_y_axis(true);
        let image = system.render(100, 100, &options).unwrap();
        let center = image.pixel(50, 50).unwrap();

        assert_eq!(center.a, 255);
        assert!(center.r > 100 && center.b > 100, "Expected purple, got {center:?}");
        assert_eq!(image.pixel(50, 10), Some(Rgba::new(255, 0, 0, 255)));
    }

    #[test]
    fn test_grid_is_drawn_beneath_elements() {
        let grid = Rgb888::new(0, 200, 0);
        let mut system = CoordinateSystem::new();
        system.add(
            Axis::horizontal()
                .with_ticks(0.5)
                .unwrap()
                .with_grid(grid),
        );
        system.add(Line::new((-1.0, -1.0), (1.0, 1.0)));

        let image = system.render(100, 100, &RenderOptions::default()).unwrap();

        assert_eq!(image.pixel(75, 80), Some(Rgba::from(grid)));
        assert_eq!(
            image.pixel(75, 25),
            Some(Rgba::new(0, 0, 0, 255)),
            "Line must cover the grid"
        );
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert!(options.axis_units_equal_length);
        assert!(!options.hide_x_axis && !options.hide_y_axis);
        assert_eq!(options.antialiasing_factor, None);
        assert_eq!(options.supersampled(10, 20).unwrap(), (10, 20, 1));
        assert_eq!(
            options.with_antialiasing(2.5).supersampled(10, 20).unwrap(),
            (25, 50, 3)
        );
    }

    #[test]
    fn test_translucent_outline_does_not_blend_with_own_fill() {
        let mut system = CoordinateSystem::new();
        system.add(
            Circle::new(0.0, 0.0, 1.0).unwrap().with_style(
                ElementStyle::stroke(Rgb888::new(255, 0, 0))
                    .with_fill(Some(Rgb888::new(0, 0, 255)))
                    .with_transparency(128),
            ),
        );

        let options = RenderOptions::default()
            .with_hidden_x_axis(true)
            .with_hidden_y_axis(true);
        let image = system.render(100, 100, &options).unwrap();

        assert_eq!(
            image.pixel(50, 0),
            Some(BACKGROUND_COLOR.over(Rgba::new(255, 0, 0, 128)))
        );
        assert_eq!(
            image.pixel(50, 50),
            Some(BACKGROUND_COLOR.over(Rgba::new(0, 0, 255, 128)))
        );
    }

    #[test]
    fn test_huge_circle_in_fixed_window() {
        let mut system = CoordinateSystem::with_extent(-1.0, 1.0, -1.0, 1.0).unwrap();
        system.add(Circle::new(0.0, 0.0, 1e9).unwrap());
        let image = system.render(100, 100, &RenderOptions::default()).unwrap();
        assert_eq!(image.pixel(10, 10), Some(BACKGROUND_COLOR));

        let fill = Rgb888::new(0, 0, 255);
        system.clear();
        system.add(
            Circle::new(0.0, 0.0, 1e9)
                .unwrap()
                .with_style(ElementStyle::default().with_fill(Some(fill))),
        );
        let image = system.render(100, 100, &RenderOptions::default()).unwrap();
        assert_eq!(image.pixel(10, 10), Some(Rgba::from(fill)));
    }

    #[test]
    fn test_oversized_render_is_rejected() {
        let mut system = CoordinateSystem::new();

        assert!(matches!(
            system.render(100, 100, &RenderOptions::default().with_antialiasing(1e6)),
            Err(CartesiusError::Configuration { .. })
        ));
        assert!(matches!(
            system.render(1 << 20, 1 << 20, &RenderOptions::default()),
            Err(CartesiusError::Configuration { .. })
        ));
        assert!(system.render(100, 100, &RenderOptions::default()).is_ok());
    }
}
