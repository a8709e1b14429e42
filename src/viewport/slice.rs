// SPDX-License-Identifier: MPL-2.0
//! Slice-compare compositor.
//!
//! In Single mode with at least one slider, the viewport shows a stack of
//! clipped layers: each layer reveals one image from the active subset in a
//! screen region bounded by two adjacent sliders (or the axis ends),
//! walking backward from the current index and wrapping around. This module
//! computes the layer stack, the label placement, and the draggable marker
//! geometry; the pane turns them into pixels.

use crate::config::{MARKER_HIT_RADIUS, SLICE_LABEL_INSET};
use crate::registry::ImageId;
use crate::viewport::store::{Slider, SlicingAxis, ViewMode, ViewState};
use iced::{Color, Point, Rectangle, Size};

/// A text label identifying a layer's image.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceLabel {
    pub text: String,
    /// Anchor in percent along the slicing axis, inset from the layer's
    /// start boundary so it stays clear of the marker handle.
    pub anchor: f32,
}

/// One clipped layer of the slice stack.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceLayer {
    pub item: ImageId,
    /// Region start in percent along the slicing axis.
    pub start: f32,
    /// Region end in percent along the slicing axis.
    pub end: f32,
    /// Stacking order; the front layer (index 0, the current image) gets
    /// the highest value.
    pub z: usize,
    pub label: Option<SliceLabel>,
}

/// A draggable boundary handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Index into the slider list, passed back on drag updates.
    pub index: usize,
    /// Position in percent along the slicing axis.
    pub position: f32,
    pub color: Color,
}

/// Computes the layer stack for the current state.
///
/// Returns an empty stack outside Single mode, without sliders, or without
/// active items. The stack is capped at the active count since every layer
/// needs a distinct source image.
#[must_use]
pub fn compute_layers(state: &ViewState) -> Vec<SliceLayer> {
    if state.view_mode != ViewMode::Single || state.sliders.is_empty() {
        return Vec::new();
    }
    let active: Vec<&crate::registry::Item> = state.active_items().collect();
    let count = active.len();
    if count == 0 {
        return Vec::new();
    }

    let layer_count = (state.sliders.len() + 1).min(count);
    (0..layer_count)
        .map(|i| {
            let index = (state.current_index as i64 - i as i64).rem_euclid(count as i64) as usize;
            let item = active[index];

            let start = if i == 0 {
                0.0
            } else {
                state.sliders[i - 1].position
            };
            let end = if i == layer_count - 1 {
                100.0
            } else {
                state.sliders[i].position
            };

            let label = state.show_slice_labels.then(|| SliceLabel {
                text: item.filename.clone(),
                anchor: (start + SLICE_LABEL_INSET).min(end),
            });

            SliceLayer {
                item: item.id,
                start,
                end,
                z: layer_count - i,
                label,
            }
        })
        .collect()
}

/// The marker handles for the current sliders.
#[must_use]
pub fn markers(state: &ViewState) -> Vec<Marker> {
    state
        .sliders
        .iter()
        .enumerate()
        .map(|(index, slider)| Marker {
            index,
            position: slider.position,
            color: slider.color,
        })
        .collect()
}

/// Pixel clip region for a layer's `[start, end]` percentage range.
#[must_use]
pub fn clip_rectangle(bounds: Rectangle, axis: SlicingAxis, start: f32, end: f32) -> Rectangle {
    let span = (end - start).max(0.0);
    match axis {
        SlicingAxis::Vertical => Rectangle::new(
            Point::new(bounds.x + bounds.width * start / 100.0, bounds.y),
            Size::new(bounds.width * span / 100.0, bounds.height),
        ),
        SlicingAxis::Horizontal => Rectangle::new(
            Point::new(bounds.x, bounds.y + bounds.height * start / 100.0),
            Size::new(bounds.width, bounds.height * span / 100.0),
        ),
    }
}

/// Converts a pointer position inside the pane into a percentage along the
/// slicing axis, clamped to `[0, 100]`.
#[must_use]
pub fn position_to_percent(axis: SlicingAxis, cursor: Point, bounds: Rectangle) -> f32 {
    let fraction = match axis {
        SlicingAxis::Vertical => (cursor.x - bounds.x) / bounds.width,
        SlicingAxis::Horizontal => (cursor.y - bounds.y) / bounds.height,
    };
    (fraction * 100.0).clamp(0.0, 100.0)
}

/// The slider index whose marker line is under the cursor, if any. With
/// several in reach, the nearest wins.
#[must_use]
pub fn marker_at(
    axis: SlicingAxis,
    cursor: Point,
    bounds: Rectangle,
    sliders: &[Slider],
) -> Option<usize> {
    let along = match axis {
        SlicingAxis::Vertical => cursor.x - bounds.x,
        SlicingAxis::Horizontal => cursor.y - bounds.y,
    };
    let extent = match axis {
        SlicingAxis::Vertical => bounds.width,
        SlicingAxis::Horizontal => bounds.height,
    };

    sliders
        .iter()
        .enumerate()
        .filter_map(|(index, slider)| {
            let marker_px = extent * slider.position / 100.0;
            let distance = (along - marker_px).abs();
            (distance <= MARKER_HIT_RADIUS).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
