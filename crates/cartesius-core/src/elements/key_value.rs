//! Series of key-value pairs drawn as a connected graph

use embedded_graphics::prelude::*;

use crate::bounds::{Bounds, DataPoint};
use crate::color::{ElementStyle, Rgba};
use crate::{CartesiusError, CartesiusResult};

use super::series::{draw_connected_series, series_bounds};
use super::{PlotElement, RenderContext};

/// Points joined in the order they are stored
///
/// The outline uses the style's color (black by default); set it to `None`
/// to draw only the fill.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueGraph {
    items: Vec<DataPoint>,
    style: ElementStyle,
    bounds: Bounds,
}

impl KeyValueGraph {
    /// Graph of pairs in the given order
    ///
    /// Fails if `pairs` is empty.
    pub fn from_pairs<I, K, V>(pairs: I) -> CartesiusResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<f64>,
        V: Into<f64>,
    {
        let items = pairs
            .into_iter()
            .map(|(key, value)| DataPoint::new(key.into(), value.into()))
            .collect();
        Self::from_items(items)
    }

    /// Graph of a key to value mapping, keys sorted ascending
    ///
    /// Accepts any map or sequence of pairs (`HashMap`, `BTreeMap`, `Vec`);
    /// the iteration order of the input does not matter. Fails if `map` is
    /// empty.
    pub fn from_map<I, K, V>(map: I) -> CartesiusResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<f64>,
        V: Into<f64>,
    {
        let mut items: Vec<DataPoint> = map
            .into_iter()
            .map(|(key, value)| DataPoint::new(key.into(), value.into()))
            .collect();
        items.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self::from_items(items)
    }

    fn from_items(items: Vec<DataPoint>) -> CartesiusResult<Self> {
        if items.is_empty() {
            return Err(CartesiusError::precondition(
                "key-value graph needs at least one item",
            ));
        }

        let mut graph = Self {
            items,
            style: ElementStyle::default(),
            bounds: Bounds::EMPTY,
        };
        graph.reload_bounds();
        Ok(graph)
    }

    /// Set the visual style
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Items in drawing order
    pub fn items(&self) -> &[DataPoint] {
        &self.items
    }
}

impl PlotElement for KeyValueGraph {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn reload_bounds(&mut self) {
        self.bounds = series_bounds(&self.items);
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn draw<D: DrawTarget<Color = Rgba>>(
        &self,
        target: &mut D,
        ctx: &RenderContext,
    ) -> Result<(), D::Error> {
        draw_connected_series(&self.items, &self.style, ctx, target)
    }
}
