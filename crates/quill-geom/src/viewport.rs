// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::rect::Rect;

/// The visible window, in the same coordinate space as block rects.
///
/// Only the height is tracked; the top edge is always `0.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    height: f64,
}

impl Viewport {
    /// Creates a viewport of the given height (negative values clamp to zero).
    #[must_use]
    pub fn new(height: f64) -> Self {
        Self {
            height: height.max(0.0),
        }
    }

    /// Viewport height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Vertical midpoint.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.height / 2.0
    }

    /// The viewport itself as a rect.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, self.height)
    }

    /// Viewport grown by `ratio * height` above and below.
    #[must_use]
    pub fn extended(&self, ratio: f64) -> Rect {
        self.bounds().inflate(self.height * ratio)
    }

    /// Band of height `ratio * height` centred on the midpoint.
    #[must_use]
    pub fn middle_band(&self, ratio: f64) -> Rect {
        let size = self.height * ratio;
        Rect::from_top_height(self.center() - size / 2.0, size)
    }

    /// Distance between a rect's midpoint and the viewport midpoint.
    #[must_use]
    pub fn distance_to_center(&self, rect: &Rect) -> f64 {
        (rect.center() - self.center()).abs()
    }
}
