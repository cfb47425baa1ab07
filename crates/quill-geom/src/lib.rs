// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Layout primitives for Quill.

This crate provides:
- Vertical extents of rendered blocks (`Rect`), in viewport coordinates.
- The viewport and the bands derived from it (`Viewport`).

Design notes:
- Only the vertical axis matters for section tracking; horizontal extents
  are not modelled.
- Overlap is strict on edges: a block whose bottom touches a band's top does
  not intersect it.
- Float64 throughout, matching the pixel values a layout engine reports.
"]

/// Vertical extents of rendered blocks.
pub mod rect;
/// Viewport geometry and derived bands.
pub mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
