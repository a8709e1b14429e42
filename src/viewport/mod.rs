// SPDX-License-Identifier: MPL-2.0
//! Viewport engine: state, cameras, layout, slice compare, and rendering.
//!
//! The modules here form the state-and-rendering core of the viewer:
//!
//! - [`store`] — the reactive state container and its event protocol
//! - [`camera`] — pure pan/zoom arithmetic
//! - [`layout`] — slot arrangement incl. the smart grid search
//! - [`slice`] — the slice-compare compositor and its markers
//! - [`renderer`] — input wiring and render-plan assembly

pub mod camera;
pub mod layout;
pub mod renderer;
pub mod slice;
pub mod store;

pub use camera::Camera;
pub use renderer::RenderPlan;
pub use store::{StateEvent, StateStore, ViewState};
