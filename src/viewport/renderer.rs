// SPDX-License-Identifier: MPL-2.0
//! Viewport renderer: turns input into state mutations and state into a
//! render plan.
//!
//! The renderer subscribes to the state store and keeps a cached
//! [`LayoutPlan`]. Structural events (items, modes, gap, index, sliders,
//! highlight) invalidate the plan; a camera event alone takes the cheap
//! path where the plan is reused and only the per-slot transforms are
//! re-derived. Pan and marker-drag sessions live entirely in this struct
//! and are cleared unconditionally on pointer release, so a cancelled
//! interaction can never leak.

use crate::registry::ImageId;
use crate::viewport::camera::{resolve_camera, Camera, ZoomDirection};
use crate::viewport::layout::{self, LayoutPlan, SlotContent};
use crate::viewport::slice::{self, Marker, SliceLayer};
use crate::viewport::store::{SlicingAxis, StateStore, ViewMode, ViewState};
use iced::keyboard::key::Named;
use iced::keyboard::Key;
use iced::{Point, Rectangle, Size, Vector};
use std::cell::Cell;
use std::rc::Rc;

/// Messages emitted by the viewport surface and the keyboard subscription.
#[derive(Debug, Clone)]
pub enum Message {
    /// The pane was laid out with a new size.
    SurfaceResized(Size),
    /// Pointer moved over the pane.
    CursorMoved(Point),
    /// Left button pressed over the pane.
    LeftPressed(Point),
    /// Left button released or the pointer left the pane.
    LeftReleased,
    /// Wheel turned over the pane; positive notches zoom in.
    WheelScrolled { notches: f32, cursor: Point },
    /// Keyboard input not captured by a text widget.
    KeyPressed(Key),
}

/// Side effects the application should perform after handling a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The visible surface changed and needs a redraw.
    Redraw,
}

/// A slot with its resolved camera transform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSlot {
    pub content: SlotContent,
    pub bounds: Rectangle,
    /// Per-slot transform: translate by `(x, y)`, scale by `zoom`.
    pub camera: Camera,
}

/// Everything the rendering surface needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct RenderPlan {
    pub surface: Size,
    pub slots: Vec<PlannedSlot>,
    /// Slice-compare layers; empty outside Single mode with sliders.
    pub layers: Vec<SliceLayer>,
    pub markers: Vec<Marker>,
    pub slicing_axis: SlicingAxis,
    /// Slot to visually emphasize, when the highlight affordance is on.
    pub highlight: Option<ImageId>,
    /// No active items: render the empty placeholder instead.
    pub placeholder: bool,
    /// Filename bubble content, Single mode only.
    pub current_filename: Option<String>,
    pub synchronized: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct DirtyFlags {
    layout: bool,
    transforms: bool,
}

#[derive(Debug, Clone, Copy)]
struct PanSession {
    start_cursor: Point,
    start_camera: Camera,
    scope: Option<ImageId>,
}

/// Renderer state: cached plan, dirty flags, and input sessions.
pub struct State {
    dirty: Rc<Cell<DirtyFlags>>,
    plan: LayoutPlan,
    surface: Size,
    pan: Option<PanSession>,
    marker_drag: Option<usize>,
    hover_scope: Option<ImageId>,
    /// Number of full layout passes performed; camera-only updates must
    /// not increase this.
    layout_passes: u64,
}

impl State {
    /// Creates the renderer and subscribes its dirty flags to the store.
    pub fn new(store: &mut StateStore) -> Self {
        let dirty = Rc::new(Cell::new(DirtyFlags {
            layout: true,
            transforms: true,
        }));
        let flags = Rc::clone(&dirty);
        store.subscribe(move |event, _state| {
            let mut current = flags.get();
            if event.is_structural() {
                current.layout = true;
            } else {
                current.transforms = true;
            }
            flags.set(current);
        });

        Self {
            dirty,
            plan: LayoutPlan::default(),
            surface: Size::ZERO,
            pan: None,
            marker_drag: None,
            hover_scope: None,
            layout_passes: 0,
        }
    }

    /// Handles an input message, mutating the store as needed.
    pub fn handle(&mut self, message: Message, store: &mut StateStore) -> Effect {
        match message {
            Message::SurfaceResized(size) => {
                if size == self.surface {
                    return Effect::None;
                }
                self.surface = size;
                let mut flags = self.dirty.get();
                flags.layout = true;
                self.dirty.set(flags);
                Effect::Redraw
            }

            Message::CursorMoved(position) => self.on_cursor_moved(position, store),

            Message::LeftPressed(position) => self.on_left_pressed(position, store),

            Message::LeftReleased => {
                // Sessions end on release anywhere, unconditionally.
                self.pan = None;
                self.marker_drag = None;
                Effect::None
            }

            Message::WheelScrolled { notches, cursor } => {
                self.on_wheel(notches, cursor, store)
            }

            Message::KeyPressed(key) => match key.as_ref() {
                Key::Named(Named::ArrowRight) => {
                    store.advance();
                    Effect::Redraw
                }
                Key::Named(Named::ArrowLeft) => {
                    store.retreat();
                    Effect::Redraw
                }
                Key::Named(Named::Space) => {
                    store.reset_camera();
                    Effect::Redraw
                }
                _ => Effect::None,
            },
        }
    }

    fn on_cursor_moved(&mut self, position: Point, store: &mut StateStore) -> Effect {
        if let Some(index) = self.marker_drag {
            let axis = store.state().slicing_axis;
            let percent = slice::position_to_percent(axis, position, self.surface_bounds());
            store.update_slider(index, percent);
            return Effect::Redraw;
        }

        if let Some(session) = self.pan {
            let delta = position - session.start_cursor;
            let camera = session.start_camera.panned(delta.x, delta.y);
            store.update_camera(session.scope, camera);
            return Effect::Redraw;
        }

        self.ensure_plan(store.state());
        let hovered = self.plan.slot_at(position).and_then(|slot| slot.image_id());
        if hovered != self.hover_scope {
            self.hover_scope = hovered;
            if store.state().show_highlight {
                return Effect::Redraw;
            }
        }
        Effect::None
    }

    fn on_left_pressed(&mut self, position: Point, store: &mut StateStore) -> Effect {
        self.ensure_plan(store.state());
        let state = store.state();

        // A press on a marker starts its drag session and never a pan.
        if state.view_mode == ViewMode::Single && !state.sliders.is_empty() {
            if let Some(index) = slice::marker_at(
                state.slicing_axis,
                position,
                self.surface_bounds(),
                &state.sliders,
            ) {
                self.marker_drag = Some(index);
                return Effect::Redraw;
            }
        }

        if let Some(id) = self.plan.slot_at(position).and_then(|slot| slot.image_id()) {
            self.hover_scope = Some(id);
            self.pan = Some(PanSession {
                start_cursor: position,
                start_camera: resolve_camera(state, id),
                scope: Some(id),
            });
        }
        Effect::None
    }

    fn on_wheel(&mut self, notches: f32, cursor: Point, store: &mut StateStore) -> Effect {
        self.ensure_plan(store.state());
        let Some(slot) = self.plan.slot_at(cursor) else {
            return Effect::None;
        };
        let Some(id) = slot.image_id() else {
            return Effect::None;
        };

        let center = slot.bounds.center();
        let offset = Vector::new(cursor.x - center.x, cursor.y - center.y);
        let direction = if notches > 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        };

        let camera = resolve_camera(store.state(), id).zoomed_at(offset, direction);
        store.update_camera(Some(id), camera);
        Effect::Redraw
    }

    /// Rebuilds the cached layout plan when a structural event or a surface
    /// resize invalidated it.
    fn ensure_plan(&mut self, state: &ViewState) {
        let flags = self.dirty.get();
        if flags.layout || self.plan.surface != self.surface {
            self.plan = layout::compute_plan(state, self.surface);
            self.layout_passes += 1;
        }
        self.dirty.set(DirtyFlags::default());
    }

    /// Assembles the frame plan: cached geometry plus freshly resolved
    /// camera transforms, slice layers, and markers.
    pub fn render_plan(&mut self, state: &ViewState) -> RenderPlan {
        self.ensure_plan(state);

        let slots = self
            .plan
            .slots
            .iter()
            .map(|slot| PlannedSlot {
                content: slot.content,
                bounds: slot.bounds,
                camera: slot
                    .image_id()
                    .map(|id| resolve_camera(state, id))
                    .unwrap_or_default(),
            })
            .collect();

        let layers = slice::compute_layers(state);
        let markers = if layers.is_empty() {
            Vec::new()
        } else {
            slice::markers(state)
        };

        RenderPlan {
            surface: self.surface,
            slots,
            layers,
            markers,
            slicing_axis: state.slicing_axis,
            highlight: state.show_highlight.then_some(self.hover_scope).flatten(),
            placeholder: self.plan.is_empty(),
            current_filename: (state.view_mode == ViewMode::Single)
                .then(|| state.current_item().map(|item| item.filename.clone()))
                .flatten(),
            synchronized: state.synchronized,
        }
    }

    /// Whether a pan session is in progress.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Whether a marker drag session is in progress.
    #[must_use]
    pub fn is_dragging_marker(&self) -> bool {
        self.marker_drag.is_some()
    }

    /// The slot id currently under the pointer.
    #[must_use]
    pub fn hover_scope(&self) -> Option<ImageId> {
        self.hover_scope
    }

    /// Full layout passes performed so far.
    #[must_use]
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    fn surface_bounds(&self) -> Rectangle {
        Rectangle::new(Point::ORIGIN, self.surface)
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("surface", &self.surface)
            .field("panning", &self.pan.is_some())
            .field("marker_drag", &self.marker_drag)
            .field("layout_passes", &self.layout_passes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::store::test_support::item;
    use crate::viewport::store::{StateStore, SubMode};

    fn setup(count: u64) -> (State, StateStore) {
        let mut store = StateStore::default();
        let mut renderer = State::new(&mut store);
        store.set_items(
            (0..count)
                .map(|i| item(i, &format!("img{i}.png"), true))
                .collect(),
        );
        renderer.handle(
            Message::SurfaceResized(Size::new(400.0, 200.0)),
            &mut store,
        );
        (renderer, store)
    }

    #[test]
    fn pan_applies_the_accumulated_delta_to_the_start_camera() {
        let (mut renderer, mut store) = setup(1);

        renderer.handle(Message::LeftPressed(Point::new(100.0, 100.0)), &mut store);
        assert!(renderer.is_panning());

        renderer.handle(Message::CursorMoved(Point::new(130.0, 90.0)), &mut store);
        let camera = store.state().global_camera;
        assert_eq!(camera.x, 30.0);
        assert_eq!(camera.y, -10.0);

        // The delta is always relative to the press position, not the
        // previous move.
        renderer.handle(Message::CursorMoved(Point::new(110.0, 120.0)), &mut store);
        let camera = store.state().global_camera;
        assert_eq!(camera.x, 10.0);
        assert_eq!(camera.y, 20.0);
    }

    #[test]
    fn release_ends_the_pan_session() {
        let (mut renderer, mut store) = setup(1);
        renderer.handle(Message::LeftPressed(Point::new(50.0, 50.0)), &mut store);
        renderer.handle(Message::LeftReleased, &mut store);
        assert!(!renderer.is_panning());

        // Moves after release pan nothing.
        renderer.handle(Message::CursorMoved(Point::new(90.0, 90.0)), &mut store);
        assert_eq!(store.state().global_camera, Camera::default());
    }

    #[test]
    fn press_outside_any_slot_does_not_pan() {
        let (mut renderer, mut store) = setup(2);
        store.set_gap(20);
        // Gap center between the two row tiles: tile width (400-20)/2 = 190.
        renderer.handle(Message::CursorMoved(Point::new(195.0, 50.0)), &mut store);
        renderer.handle(Message::LeftPressed(Point::new(195.0, 50.0)), &mut store);
        assert!(!renderer.is_panning());
    }

    #[test]
    fn wheel_zooms_anchored_at_the_slot_center_offset() {
        let (mut renderer, mut store) = setup(1);

        // Slot covers the whole 400×200 surface; its center is (200, 100).
        renderer.handle(
            Message::WheelScrolled {
                notches: 1.0,
                cursor: Point::new(200.0, 100.0),
            },
            &mut store,
        );
        let camera = store.state().global_camera;
        // Cursor at the exact center: zoom changes, pan stays put.
        assert!(camera.zoom > 1.0);
        assert_eq!(camera.x, 0.0);
        assert_eq!(camera.y, 0.0);

        renderer.handle(
            Message::WheelScrolled {
                notches: -1.0,
                cursor: Point::new(200.0, 100.0),
            },
            &mut store,
        );
        assert!((store.state().global_camera.zoom - 1.0).abs() < 1e-4);
    }

    #[test]
    fn wheel_in_unsynchronized_mode_targets_the_hovered_slot() {
        let (mut renderer, mut store) = setup(2);
        store.set_synchronized(false);
        let ids: Vec<ImageId> = store.state().items.iter().map(|i| i.id).collect();

        // Second row tile spans x in [202.5, 400].
        renderer.handle(
            Message::WheelScrolled {
                notches: 1.0,
                cursor: Point::new(300.0, 100.0),
            },
            &mut store,
        );

        let state = store.state();
        assert!(state.individual_cameras[&ids[1]].zoom > 1.0);
        assert!(!state.individual_cameras.contains_key(&ids[0]));
    }

    #[test]
    fn camera_events_take_the_cheap_path() {
        let (mut renderer, mut store) = setup(3);
        renderer.render_plan(store.state());
        let passes = renderer.layout_passes();

        store.update_camera(None, Camera::new(5.0, 5.0, 2.0));
        store.reset_camera();
        renderer.render_plan(store.state());
        assert_eq!(renderer.layout_passes(), passes);

        store.set_sub_mode(SubMode::Grid);
        renderer.render_plan(store.state());
        assert_eq!(renderer.layout_passes(), passes + 1);
    }

    #[test]
    fn marker_press_starts_a_drag_and_never_a_pan() {
        let (mut renderer, mut store) = setup(3);
        store.set_view_mode(ViewMode::Single);
        store.add_slider(); // position 50 → x = 200 on a 400px surface

        renderer.handle(Message::LeftPressed(Point::new(201.0, 50.0)), &mut store);
        assert!(renderer.is_dragging_marker());
        assert!(!renderer.is_panning());
    }

    #[test]
    fn marker_drag_moves_the_slider_by_cursor_percent() {
        let (mut renderer, mut store) = setup(3);
        store.set_view_mode(ViewMode::Single);
        store.add_slider();

        renderer.handle(Message::LeftPressed(Point::new(200.0, 50.0)), &mut store);
        renderer.handle(Message::CursorMoved(Point::new(100.0, 80.0)), &mut store);
        assert_eq!(store.state().sliders[0].position, 25.0);

        renderer.handle(Message::LeftReleased, &mut store);
        assert!(!renderer.is_dragging_marker());
    }

    #[test]
    fn arrow_keys_navigate_and_space_resets_the_camera() {
        let (mut renderer, mut store) = setup(3);
        store.update_camera(None, Camera::new(9.0, 9.0, 3.0));

        renderer.handle(Message::KeyPressed(Key::Named(Named::ArrowRight)), &mut store);
        assert_eq!(store.state().current_index, 1);

        renderer.handle(Message::KeyPressed(Key::Named(Named::ArrowLeft)), &mut store);
        assert_eq!(store.state().current_index, 0);

        renderer.handle(Message::KeyPressed(Key::Named(Named::Space)), &mut store);
        assert_eq!(store.state().global_camera, Camera::default());
    }

    #[test]
    fn hover_tracks_the_slot_under_the_cursor() {
        let (mut renderer, mut store) = setup(2);
        let ids: Vec<ImageId> = store.state().items.iter().map(|i| i.id).collect();

        renderer.handle(Message::CursorMoved(Point::new(10.0, 10.0)), &mut store);
        assert_eq!(renderer.hover_scope(), Some(ids[0]));

        renderer.handle(Message::CursorMoved(Point::new(390.0, 10.0)), &mut store);
        assert_eq!(renderer.hover_scope(), Some(ids[1]));
    }

    #[test]
    fn render_plan_reports_placeholder_for_empty_active_set() {
        let (mut renderer, mut store) = setup(0);
        let plan = renderer.render_plan(store.state());
        assert!(plan.placeholder);
        assert!(plan.slots.is_empty());

        store.set_items(vec![item(0, "a.png", true)]);
        let plan = renderer.render_plan(store.state());
        assert!(!plan.placeholder);
        assert_eq!(plan.slots.len(), 1);
    }

    #[test]
    fn render_plan_carries_filename_only_in_single_mode() {
        let (mut renderer, mut store) = setup(2);
        let plan = renderer.render_plan(store.state());
        assert_eq!(plan.current_filename, None);

        store.set_view_mode(ViewMode::Single);
        let plan = renderer.render_plan(store.state());
        assert_eq!(plan.current_filename.as_deref(), Some("img0.png"));
    }

    #[test]
    fn render_plan_includes_layers_and_markers_in_slice_mode() {
        let (mut renderer, mut store) = setup(3);
        store.set_view_mode(ViewMode::Single);
        store.add_slider();
        store.add_slider();

        let plan = renderer.render_plan(store.state());
        assert_eq!(plan.layers.len(), 3);
        assert_eq!(plan.markers.len(), 2);
    }
}
