//! Row layout of panels inside the window.
//!
//! Sizes are configured in logical pixels and resolved to physical pixels with
//! the window's scale factor. Fixed panel sizes shrink to fit when the window
//! is too small, the way flex items shrink in a row.

use winit::dpi::PhysicalSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub padding: u32,
    pub gap: u32,
    pub panel_width: Option<u32>,
    pub panel_height: Option<u32>,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            padding: 40,
            gap: 16,
            panel_width: Some(500),
            panel_height: Some(400),
        }
    }
}

/// Panel rectangle in physical pixels, origin at the window's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PanelRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        !self.is_empty()
            && x >= self.x as f64
            && y >= self.y as f64
            && x < (self.x + self.width) as f64
            && y < (self.y + self.height) as f64
    }

    /// Position relative to the panel, `(0, 0)` top-left to `(1, 1)`
    /// bottom-right.
    pub fn normalize(&self, x: f64, y: f64) -> [f32; 2] {
        let w = self.width.max(1) as f64;
        let h = self.height.max(1) as f64;
        [
            ((x - self.x as f64) / w).clamp(0.0, 1.0) as f32,
            ((y - self.y as f64) / h).clamp(0.0, 1.0) as f32,
        ]
    }

    /// The part of the rect inside a `width` x `height` target, if any.
    pub fn clip(&self, width: u32, height: u32) -> Option<PanelRect> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let clipped = PanelRect {
            x: self.x,
            y: self.y,
            width: self.width.min(width - self.x),
            height: self.height.min(height - self.y),
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

impl PanelLayout {
    /// Resolves `count` panel rectangles for a window of `size`.
    pub fn compute(&self, count: usize, size: PhysicalSize<u32>, scale_factor: f64) -> Vec<PanelRect> {
        if count == 0 {
            return Vec::new();
        }
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        let padding = (self.padding as f64 * scale).round();
        let gap = (self.gap as f64 * scale).round();
        let available_w = (size.width as f64 - 2.0 * padding).max(0.0);
        let available_h = (size.height as f64 - 2.0 * padding).max(0.0);

        let even = ((available_w - gap * (count - 1) as f64) / count as f64).max(0.0);
        let width = match self.panel_width {
            Some(fixed) => (fixed as f64 * scale).min(even),
            None => even,
        }
        .floor();
        let height = match self.panel_height {
            Some(fixed) => (fixed as f64 * scale).min(available_h),
            None => available_h,
        }
        .floor();

        (0..count)
            .map(|index| PanelRect {
                x: (padding + index as f64 * (width + gap)) as u32,
                y: padding as u32,
                width: width as u32,
                height: height as u32,
            })
            .collect()
    }
}

/// Index of the panel under `(x, y)`, if any.
pub fn hit_test(rects: &[PanelRect], x: f64, y: f64) -> Option<usize> {
    rects.iter().position(|rect| rect.contains(x, y))
}
