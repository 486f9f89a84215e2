//! Geometry and page providers (consumed interfaces) and font metrics

use crate::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use word_model::NodeId;

/// Fraction of the DPI taken by the cap height
pub const CAP_HEIGHT_FRACTION: f32 = 0.075;
/// Fraction of the DPI taken by the ascender height
pub const ASCENDER_FRACTION: f32 = 0.11;
/// Fraction of the DPI taken by the descender height
pub const DESCENDER_FRACTION: f32 = 0.05;
/// Fraction of the DPI taken by the full body height
pub const BODY_HEIGHT_FRACTION: f32 = 0.17;

/// Font-metric constants derived from a DPI setting.
///
/// Each height is `round(dpi * fraction)`, matching what the rendering
/// surface reports for the configured manuscript font.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub dpi: f32,
    pub cap_height: f32,
    pub ascender_height: f32,
    pub descender_height: f32,
    pub body_height: f32,
}

impl FontMetrics {
    /// Derive metrics from a DPI setting
    pub fn from_dpi(dpi: f32) -> Self {
        Self {
            dpi,
            cap_height: (dpi * CAP_HEIGHT_FRACTION).round(),
            ascender_height: (dpi * ASCENDER_FRACTION).round(),
            descender_height: (dpi * DESCENDER_FRACTION).round(),
            body_height: (dpi * BODY_HEIGHT_FRACTION).round(),
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::from_dpi(96.0)
    }
}

/// Reports the rendered size of a word box.
///
/// Implemented by the rendering surface in production and by a headless
/// table in tests; the layout engine never measures text itself.
pub trait GeometryProvider {
    /// Current rendered width/height of a word, if it is known
    fn measure(&self, id: NodeId) -> Option<Size>;
}

/// Reports page dimensions and margin rectangles.
pub trait PageProvider {
    /// Full page size
    fn page_size(&self, page: u32) -> Size;

    /// Margin rectangle (the area content may occupy)
    fn margins(&self, page: u32) -> Rect;
}

/// Headless geometry: a fixed table of sizes with a default fallback.
#[derive(Debug, Clone)]
pub struct HeadlessGeometry {
    sizes: HashMap<NodeId, Size>,
    default: Size,
}

impl HeadlessGeometry {
    /// Create with a default size used for unmeasured words
    pub fn new(default: Size) -> Self {
        Self {
            sizes: HashMap::new(),
            default,
        }
    }

    /// Record the size of one word
    pub fn set(&mut self, id: NodeId, size: Size) {
        self.sizes.insert(id, size);
    }
}

impl Default for HeadlessGeometry {
    fn default() -> Self {
        Self::new(Size::new(60.0, 24.0))
    }
}

impl GeometryProvider for HeadlessGeometry {
    fn measure(&self, id: NodeId) -> Option<Size> {
        Some(self.sizes.get(&id).copied().unwrap_or(self.default))
    }
}

/// Uniform pages: one size and margin inset for every page.
#[derive(Debug, Clone, Copy)]
pub struct UniformPages {
    pub size: Size,
    pub inset: f32,
}

impl UniformPages {
    pub fn new(size: Size, inset: f32) -> Self {
        Self { size, inset }
    }
}

impl Default for UniformPages {
    fn default() -> Self {
        // US Letter at 96 dpi
        Self::new(Size::new(816.0, 1056.0), 48.0)
    }
}

impl PageProvider for UniformPages {
    fn page_size(&self, _page: u32) -> Size {
        self.size
    }

    fn margins(&self, _page: u32) -> Rect {
        Rect::new(
            self.inset,
            self.inset,
            self.size.width - 2.0 * self.inset,
            self.size.height - 2.0 * self.inset,
        )
    }
}
