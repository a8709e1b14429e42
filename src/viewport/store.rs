// SPDX-License-Identifier: MPL-2.0
//! Reactive state container for the viewport.
//!
//! [`StateStore`] owns the single [`ViewState`] instance and is the only
//! place it is ever mutated. Every mutator restores the state invariants and
//! then notifies subscribers synchronously, in subscription order, with a
//! typed [`StateEvent`] describing what changed.
//!
//! Re-entrant mutation is impossible by construction: `notify` runs while
//! the store is exclusively borrowed, so no subscriber can hold an alias
//! back into the store. Subscribing during dispatch is ruled out the same
//! way.

use crate::config::{
    SLIDER_FIRST_POSITION, SLIDER_MAX_SPAWN_POSITION, SLIDER_MIN_SEPARATION, SLIDER_PALETTE,
    SLIDER_SPAWN_STEP,
};
use crate::registry::{ImageId, Item};
use crate::viewport::camera::{clamp_zoom, Camera};
use iced::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Top-level display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// One image at a time, with slice compare available.
    Single,
    /// All active images at once, arranged by [`SubMode`].
    #[default]
    Multi,
}

/// Arrangement of the active images in Multi mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubMode {
    #[default]
    Row,
    Column,
    Grid,
}

/// Axis along which slice-compare boundaries run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlicingAxis {
    /// Boundaries are vertical lines; the screen splits horizontally.
    #[default]
    Vertical,
    /// Boundaries are horizontal lines; the screen splits vertically.
    Horizontal,
}

/// A slice-compare boundary at a percentage along the slicing axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    /// Position in `[0, 100]`. Positions are strictly increasing across
    /// the slider list.
    pub position: f32,
    /// Marker color, cycled from a fixed palette.
    pub color: Color,
}

/// Named event describing which part of the state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateEvent {
    Items,
    Camera,
    Sliders,
    Index,
    ViewMode,
    Gap,
    Highlight,
    SubMode,
}

impl StateEvent {
    /// Every event except `Camera` invalidates the layout; a camera change
    /// only requires re-applying transforms.
    #[must_use]
    pub fn is_structural(self) -> bool {
        !matches!(self, StateEvent::Camera)
    }
}

/// The complete view-affecting state. Owned exclusively by [`StateStore`].
#[derive(Debug, Clone)]
pub struct ViewState {
    /// All known items in server order; the active subset is the
    /// order-preserving filtered view.
    pub items: Vec<Item>,
    pub view_mode: ViewMode,
    pub sub_mode: SubMode,
    /// Pixel spacing between tiles.
    pub gap: u16,
    pub show_highlight: bool,
    /// Index into the *active* subset. Always valid while that subset is
    /// non-empty, else 0.
    pub current_index: usize,
    pub synchronized: bool,
    pub global_camera: Camera,
    pub individual_cameras: HashMap<ImageId, Camera>,
    /// Strictly increasing by position.
    pub sliders: Vec<Slider>,
    pub slicing_axis: SlicingAxis,
    pub show_slice_labels: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            view_mode: ViewMode::Multi,
            sub_mode: SubMode::Row,
            gap: crate::config::DEFAULT_GAP_PX,
            show_highlight: false,
            current_index: 0,
            synchronized: true,
            global_camera: Camera::default(),
            individual_cameras: HashMap::new(),
            sliders: Vec::new(),
            slicing_axis: SlicingAxis::Vertical,
            show_slice_labels: true,
        }
    }
}

impl ViewState {
    /// Iterates the active subset in item order.
    pub fn active_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.active)
    }

    /// Number of active items.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_items().count()
    }

    /// The active item selected by `current_index`, if any.
    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        self.active_items().nth(self.current_index)
    }
}

type Subscriber = Box<dyn FnMut(StateEvent, &ViewState)>;

/// Owns the [`ViewState`] and the subscriber registry.
pub struct StateStore {
    state: ViewState,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(ViewState::default())
    }
}

impl StateStore {
    /// Creates a store around an initial state.
    #[must_use]
    pub fn new(state: ViewState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
        }
    }

    /// Read access to the current state.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Registers a subscriber. Delivery is synchronous, in subscription
    /// order, on the calling thread.
    pub fn subscribe(&mut self, subscriber: impl FnMut(StateEvent, &ViewState) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(&mut self, event: StateEvent) {
        log::debug!("state event: {event:?}");
        let state = &self.state;
        for subscriber in &mut self.subscribers {
            subscriber(event, state);
        }
    }

    /// Replaces the item list and restores every dependent invariant:
    /// trailing sliders are popped until the slider count fits the active
    /// count again, and the current index is reset when it falls out of
    /// range or the active subset becomes empty.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.state.items = items;

        let active = self.state.active_count();
        let slider_cap = active.saturating_sub(1);
        let mut sliders_removed = false;
        while self.state.sliders.len() > slider_cap {
            self.state.sliders.pop();
            sliders_removed = true;
        }

        let mut index_changed = false;
        if active == 0 || self.state.current_index >= active {
            index_changed = self.state.current_index != 0;
            self.state.current_index = 0;
        }

        self.notify(StateEvent::Items);
        if sliders_removed {
            self.notify(StateEvent::Sliders);
        }
        if index_changed {
            self.notify(StateEvent::Index);
        }
    }

    /// Switches the display mode. Single mode has exactly one camera by
    /// definition, so entering it forces synchronization.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
        if mode == ViewMode::Single {
            self.state.synchronized = true;
            self.notify(StateEvent::ViewMode);
            self.notify(StateEvent::Camera);
        } else {
            self.notify(StateEvent::ViewMode);
        }
    }

    pub fn set_sub_mode(&mut self, sub_mode: SubMode) {
        self.state.sub_mode = sub_mode;
        self.notify(StateEvent::SubMode);
    }

    pub fn set_gap(&mut self, gap: u16) {
        self.state.gap = gap;
        self.notify(StateEvent::Gap);
    }

    pub fn set_highlight(&mut self, show: bool) {
        self.state.show_highlight = show;
        self.notify(StateEvent::Highlight);
    }

    /// Flips camera synchronization. Enabling it snapshots the global
    /// camera into every individual entry first, so a later switch back to
    /// unsynchronized starts from the last shared view.
    pub fn set_synchronized(&mut self, synchronized: bool) {
        if synchronized {
            let snapshot = self.state.global_camera;
            for camera in self.state.individual_cameras.values_mut() {
                *camera = snapshot;
            }
        }
        self.state.synchronized = synchronized;
        self.notify(StateEvent::Camera);
    }

    /// Writes the camera for the given scope. The zoom is clamped here so
    /// no out-of-range value can ever enter the state.
    pub fn update_camera(&mut self, scope: Option<ImageId>, camera: Camera) {
        let camera = Camera {
            zoom: clamp_zoom(camera.zoom),
            ..camera
        };

        if self.state.synchronized || self.state.view_mode == ViewMode::Single {
            self.state.global_camera = camera;
        } else if let Some(id) = scope {
            self.state.individual_cameras.insert(id, camera);
        }
        self.notify(StateEvent::Camera);
    }

    /// Resets the authoritative camera(s): the global one when synchronized
    /// or in Single mode, otherwise every individual camera.
    pub fn reset_camera(&mut self) {
        if self.state.synchronized || self.state.view_mode == ViewMode::Single {
            self.state.global_camera = Camera::reset();
        } else {
            for camera in self.state.individual_cameras.values_mut() {
                *camera = Camera::reset();
            }
        }
        self.notify(StateEvent::Camera);
    }

    /// Steps to the next active item, wrapping around. No-op without
    /// active items.
    pub fn advance(&mut self) {
        self.step_index(1);
    }

    /// Steps to the previous active item, wrapping around. No-op without
    /// active items.
    pub fn retreat(&mut self) {
        self.step_index(-1);
    }

    fn step_index(&mut self, delta: isize) {
        let active = self.state.active_count();
        if active == 0 {
            return;
        }
        let current = self.state.current_index as isize;
        self.state.current_index = (current + delta).rem_euclid(active as isize) as usize;
        self.notify(StateEvent::Index);
        // Slice layers are derived from the current index, so their
        // consumers must re-derive as well.
        if !self.state.sliders.is_empty() {
            self.notify(StateEvent::Sliders);
        }
    }

    /// Adds a slice boundary. Permitted only while there are fewer sliders
    /// than `active_count − 1`; each layer needs a distinct source image.
    pub fn add_slider(&mut self) {
        let active = self.state.active_count();
        if active == 0 || self.state.sliders.len() >= active - 1 {
            return;
        }

        let position = match self.state.sliders.last() {
            None => SLIDER_FIRST_POSITION,
            Some(last) => {
                let candidate = (last.position + SLIDER_SPAWN_STEP).min(SLIDER_MAX_SPAWN_POSITION);
                if candidate <= last.position {
                    // No room left before the end of the axis.
                    return;
                }
                candidate
            }
        };
        let color = SLIDER_PALETTE[self.state.sliders.len() % SLIDER_PALETTE.len()];

        self.state.sliders.push(Slider { position, color });
        // Spawn positions are already monotonic; the sort defends the
        // strict-ordering invariant against any future insertion rule.
        self.state
            .sliders
            .sort_by(|a, b| a.position.total_cmp(&b.position));
        self.notify(StateEvent::Sliders);
    }

    /// Removes the last slice boundary, if any.
    pub fn remove_slider(&mut self) {
        if self.state.sliders.pop().is_some() {
            self.notify(StateEvent::Sliders);
        }
    }

    /// Moves a slider, clamping the position between its neighbors so the
    /// strict ordering holds without a re-sort. An out-of-range index is a
    /// no-op: marker input is bounded by the rendered state, so there is
    /// nothing to fail over.
    pub fn update_slider(&mut self, index: usize, position: f32) {
        let len = self.state.sliders.len();
        if index >= len {
            return;
        }

        let low = if index == 0 {
            0.0
        } else {
            self.state.sliders[index - 1].position + SLIDER_MIN_SEPARATION
        };
        let high = if index == len - 1 {
            100.0
        } else {
            self.state.sliders[index + 1].position - SLIDER_MIN_SEPARATION
        };
        if low > high {
            return;
        }

        self.state.sliders[index].position = position.clamp(low, high);
        self.notify(StateEvent::Sliders);
    }

    pub fn set_slicing_axis(&mut self, axis: SlicingAxis) {
        self.state.slicing_axis = axis;
        self.notify(StateEvent::Sliders);
    }

    pub fn set_slice_labels_visible(&mut self, visible: bool) {
        self.state.show_slice_labels = visible;
        self.notify(StateEvent::Sliders);
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// Builds an item with a raw id, for tests that need no registry.
    #[must_use]
    pub fn item(id: u64, filename: &str, active: bool) -> Item {
        Item {
            id: ImageId::from_raw(id),
            filename: filename.to_string(),
            active,
        }
    }

    /// A default state carrying the given items.
    #[must_use]
    pub fn state_with_items(items: Vec<Item>) -> ViewState {
        ViewState {
            items,
            ..ViewState::default()
        }
    }
}
