// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Camera**: Zoom bounds and the wheel zoom factor
//! - **Layout**: Tile gap bounds
//! - **Slice compare**: Slider spawning, separation, and marker geometry

use iced::Color;

// ==========================================================================
// Camera Defaults
// ==========================================================================

/// Default zoom factor when a camera is created or reset (1.0 = original size).
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Minimum allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.05;

/// Maximum allowed zoom factor.
pub const MAX_ZOOM: f32 = 50.0;

/// Multiplicative zoom step applied per mouse-wheel notch.
pub const WHEEL_ZOOM_FACTOR: f32 = 1.1;

// ==========================================================================
// Layout Defaults
// ==========================================================================

/// Default pixel gap between viewport tiles.
pub const DEFAULT_GAP_PX: u16 = 5;

/// Maximum pixel gap selectable from the sidebar.
pub const MAX_GAP_PX: u16 = 50;

// ==========================================================================
// Slice Compare Defaults
// ==========================================================================

/// Position of the first slider when none exist yet (percent).
pub const SLIDER_FIRST_POSITION: f32 = 50.0;

/// Offset added to the last slider's position when spawning a new one.
pub const SLIDER_SPAWN_STEP: f32 = 10.0;

/// Upper bound for a newly spawned slider's position (percent).
pub const SLIDER_MAX_SPAWN_POSITION: f32 = 98.0;

/// Minimum separation kept between adjacent sliders while dragging (percent).
pub const SLIDER_MIN_SEPARATION: f32 = 1.0;

/// Pointer distance from a marker line that still counts as a hit (pixels).
pub const MARKER_HIT_RADIUS: f32 = 8.0;

/// Inset of a slice label from its layer's start boundary (percent along
/// the slicing axis), keeping the label clear of the marker handle.
pub const SLICE_LABEL_INSET: f32 = 2.0;

/// Fixed palette for slider marker colors, cycled by slider index.
pub const SLIDER_PALETTE: [Color; 6] = [
    Color::from_rgb(0.95, 0.45, 0.30), // Coral
    Color::from_rgb(0.35, 0.70, 0.95), // Sky blue
    Color::from_rgb(0.55, 0.85, 0.45), // Green
    Color::from_rgb(0.95, 0.80, 0.35), // Amber
    Color::from_rgb(0.75, 0.50, 0.95), // Violet
    Color::from_rgb(0.95, 0.55, 0.80), // Pink
];
