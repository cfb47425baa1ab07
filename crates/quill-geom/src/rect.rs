// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use serde::{Deserialize, Serialize};

/// Vertical extent of a rendered element in viewport coordinates.
///
/// Invariants:
/// - `top` is less than or equal to `bottom`.
/// - Values are CSS pixels; `0.0` is the top edge of the viewport and values
///   grow downward.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRect", into = "RawRect")]
pub struct Rect {
    top: f64,
    bottom: f64,
}

#[derive(Serialize, Deserialize)]
struct RawRect {
    top: f64,
    bottom: f64,
}

impl TryFrom<RawRect> for Rect {
    type Error = String;

    fn try_from(raw: RawRect) -> Result<Self, Self::Error> {
        if raw.top.is_finite() && raw.bottom.is_finite() {
            Ok(Self::new(raw.top, raw.bottom))
        } else {
            Err(format!("non-finite rect {}..{}", raw.top, raw.bottom))
        }
    }
}

impl From<Rect> for RawRect {
    fn from(r: Rect) -> Self {
        Self {
            top: r.top,
            bottom: r.bottom,
        }
    }
}

impl Rect {
    /// Constructs a rect from its two edges. Swapped edges are reordered.
    #[must_use]
    pub fn new(top: f64, bottom: f64) -> Self {
        if bottom < top {
            Self {
                top: bottom,
                bottom: top,
            }
        } else {
            Self { top, bottom }
        }
    }

    /// Builds a rect from its top edge and a height (negative heights clamp to zero).
    #[must_use]
    pub fn from_top_height(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height.max(0.0),
        }
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Height (`bottom - top`).
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Vertical midpoint.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.top + self.height() / 2.0
    }

    /// Returns `true` if the two rects share interior (edges touching do not count).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.bottom > other.top && self.top < other.bottom
    }

    /// Length of the overlap with `window`; negative when the rects are disjoint.
    #[must_use]
    pub fn overlap_extent(&self, window: &Self) -> f64 {
        self.bottom.min(window.bottom) - self.top.max(window.top)
    }

    /// Grows the rect by `m` on both edges.
    #[must_use]
    pub fn inflate(&self, m: f64) -> Self {
        Self::new(self.top - m, self.bottom + m)
    }

    /// Shifts the rect by `dy` (positive moves it down).
    #[must_use]
    pub fn translate(&self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            bottom: self.bottom + dy,
        }
    }
}
