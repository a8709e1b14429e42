// SPDX-License-Identifier: MPL-2.0
//! Camera model: pure pan/zoom arithmetic over [`Camera`] values.
//!
//! A camera is a 2D pan offset plus a zoom factor applied to a displayed
//! image. All functions here are pure; resolving a camera for an item never
//! creates or mutates state as a side effect of the read.

use crate::config::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_FACTOR};
use crate::registry::ImageId;
use crate::viewport::store::{ViewMode, ViewState};
use iced::Vector;

/// Pan offset in screen pixels plus a zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Direction of a wheel zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl Camera {
    /// Creates a camera with the given offsets and a clamped zoom.
    #[must_use]
    pub fn new(x: f32, y: f32, zoom: f32) -> Self {
        Self {
            x,
            y,
            zoom: clamp_zoom(zoom),
        }
    }

    /// Translates the camera by a pixel delta in screen space; zoom unchanged.
    #[must_use]
    pub fn panned(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Applies one multiplicative wheel-zoom step anchored at the cursor.
    ///
    /// `offset` is the cursor position relative to the slot's visual center.
    /// The pan offset is repositioned so the image point under the cursor
    /// stays fixed on screen:
    /// `new_pos = offset − (offset − old_pos) · (new_zoom / old_zoom)`.
    /// The ratio is taken after clamping, so a step at the zoom bound leaves
    /// the camera untouched instead of sliding the image.
    #[must_use]
    pub fn zoomed_at(self, offset: Vector, direction: ZoomDirection) -> Self {
        let factor = match direction {
            ZoomDirection::In => WHEEL_ZOOM_FACTOR,
            ZoomDirection::Out => 1.0 / WHEEL_ZOOM_FACTOR,
        };
        let new_zoom = clamp_zoom(self.zoom * factor);
        let ratio = new_zoom / self.zoom;

        Self {
            x: offset.x - (offset.x - self.x) * ratio,
            y: offset.y - (offset.y - self.y) * ratio,
            zoom: new_zoom,
        }
    }

    /// The identity camera: no pan, zoom 1.0.
    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }
}

/// Clamps a zoom factor to the supported range.
#[must_use]
pub fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Returns the authoritative camera for the given scope.
///
/// The global camera applies when synchronized or in Single mode (Single
/// has exactly one camera by definition). Otherwise the item's individual
/// camera applies, falling back to the global one when the scope has no
/// entry — a stale or never-seen scope id is never an error.
#[must_use]
pub fn resolve_camera(state: &ViewState, scope: ImageId) -> Camera {
    if state.synchronized || state.view_mode == ViewMode::Single {
        state.global_camera
    } else {
        state
            .individual_cameras
            .get(&scope)
            .copied()
            .unwrap_or(state.global_camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::store::test_support::{item, state_with_items};

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "expected {a} ≈ {b}");
    }

    #[test]
    fn default_camera_is_identity() {
        let cam = Camera::default();
        assert_eq!(cam.x, 0.0);
        assert_eq!(cam.y, 0.0);
        assert_eq!(cam.zoom, 1.0);
    }

    #[test]
    fn panned_translates_without_touching_zoom() {
        let cam = Camera::new(10.0, -5.0, 2.0).panned(3.0, 7.0);
        assert_eq!(cam.x, 13.0);
        assert_eq!(cam.y, 2.0);
        assert_eq!(cam.zoom, 2.0);
    }

    #[test]
    fn zoom_stays_clamped_under_repeated_steps() {
        let mut cam = Camera::default();
        for _ in 0..200 {
            cam = cam.zoomed_at(Vector::new(0.0, 0.0), ZoomDirection::In);
        }
        assert!(cam.zoom <= MAX_ZOOM);

        for _ in 0..400 {
            cam = cam.zoomed_at(Vector::new(0.0, 0.0), ZoomDirection::Out);
        }
        assert!(cam.zoom >= MIN_ZOOM);
    }

    #[test]
    fn zoom_at_center_keeps_pan_offset() {
        let cam = Camera::new(12.0, -8.0, 1.0);
        let zoomed = cam.zoomed_at(Vector::new(12.0, -8.0), ZoomDirection::In);
        // The cursor sits exactly on the pan origin, so it must not move.
        assert_close(zoomed.x, 12.0);
        assert_close(zoomed.y, -8.0);
    }

    #[test]
    fn zoom_in_then_out_at_same_offset_restores_position() {
        let cam = Camera::new(40.0, 25.0, 1.5);
        let offset = Vector::new(-30.0, 60.0);

        let round_trip = cam
            .zoomed_at(offset, ZoomDirection::In)
            .zoomed_at(offset, ZoomDirection::Out);

        assert_close(round_trip.x, cam.x);
        assert_close(round_trip.y, cam.y);
        assert_close(round_trip.zoom, cam.zoom);
    }

    #[test]
    fn zoom_at_bound_does_not_slide_the_image() {
        let cam = Camera::new(40.0, 25.0, MAX_ZOOM);
        let zoomed = cam.zoomed_at(Vector::new(100.0, 100.0), ZoomDirection::In);
        assert_eq!(zoomed.x, cam.x);
        assert_eq!(zoomed.y, cam.y);
        assert_eq!(zoomed.zoom, MAX_ZOOM);
    }

    #[test]
    fn resolve_prefers_global_when_synchronized() {
        let mut state = state_with_items(vec![item(0, "a.png", true)]);
        state.synchronized = true;
        state.global_camera = Camera::new(1.0, 2.0, 3.0);
        state
            .individual_cameras
            .insert(state.items[0].id, Camera::new(9.0, 9.0, 9.0));

        let cam = resolve_camera(&state, state.items[0].id);
        assert_eq!(cam, state.global_camera);
    }

    #[test]
    fn resolve_prefers_global_in_single_mode() {
        let mut state = state_with_items(vec![item(0, "a.png", true)]);
        state.synchronized = false;
        state.view_mode = ViewMode::Single;
        state.global_camera = Camera::new(1.0, 2.0, 3.0);
        state
            .individual_cameras
            .insert(state.items[0].id, Camera::new(9.0, 9.0, 9.0));

        let cam = resolve_camera(&state, state.items[0].id);
        assert_eq!(cam, state.global_camera);
    }

    #[test]
    fn resolve_falls_back_to_global_for_stale_scope() {
        let mut state = state_with_items(vec![
            item(0, "a.png", true),
            item(1, "b.png", true),
        ]);
        state.view_mode = ViewMode::Multi;
        state.synchronized = false;
        state.global_camera = Camera::new(5.0, 5.0, 2.0);

        // No individual entry exists for the second item.
        let cam = resolve_camera(&state, state.items[1].id);
        assert_eq!(cam, state.global_camera);
    }

    #[test]
    fn resolve_uses_individual_camera_when_unsynchronized() {
        let mut state = state_with_items(vec![item(0, "a.png", true)]);
        state.view_mode = ViewMode::Multi;
        state.synchronized = false;
        let individual = Camera::new(7.0, -3.0, 0.5);
        state.individual_cameras.insert(state.items[0].id, individual);

        let cam = resolve_camera(&state, state.items[0].id);
        assert_eq!(cam, individual);
    }
}
