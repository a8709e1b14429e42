// SPDX-License-Identifier: MPL-2.0
//! Layout engine: geometric arrangement of the active items.
//!
//! Given the view state and the surface size, produces a [`LayoutPlan`] of
//! slots with pixel bounds. Grid mode runs the smart column search that
//! maximizes per-tile display area and pads the last row with filler slots
//! so the rectangle stays visually complete.

use crate::registry::ImageId;
use crate::viewport::store::{SubMode, ViewMode, ViewState};
use iced::{Point, Rectangle, Size};

/// What a slot displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotContent {
    Image(ImageId),
    /// Empty cell completing the grid rectangle.
    Filler,
}

/// One tile of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub content: SlotContent,
    pub bounds: Rectangle,
}

impl Slot {
    /// The image id shown in this slot, if it is not a filler.
    #[must_use]
    pub fn image_id(&self) -> Option<ImageId> {
        match self.content {
            SlotContent::Image(id) => Some(id),
            SlotContent::Filler => None,
        }
    }
}

/// Grid dimensions chosen by the column search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub columns: usize,
    pub rows: usize,
}

/// The computed arrangement for one render pass.
///
/// An empty plan (no slots) is the defined outcome for an empty active
/// set; the surface renders its placeholder state instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    pub surface: Size,
    pub slots: Vec<Slot>,
    pub grid: Option<GridDims>,
}

impl LayoutPlan {
    /// Checks whether the plan holds no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot under the given point, if any.
    #[must_use]
    pub fn slot_at(&self, point: Point) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.bounds.contains(point))
    }
}

/// Computes the placement plan for the current state.
#[must_use]
pub fn compute_plan(state: &ViewState, surface: Size) -> LayoutPlan {
    let active: Vec<&crate::registry::Item> = state.active_items().collect();
    if active.is_empty() {
        return LayoutPlan {
            surface,
            ..LayoutPlan::default()
        };
    }

    let gap = f32::from(state.gap);
    match (state.view_mode, state.sub_mode) {
        (ViewMode::Single, _) => single_plan(state, &active, surface),
        (ViewMode::Multi, SubMode::Row) => strip_plan(&active, surface, gap, Axis::Horizontal),
        (ViewMode::Multi, SubMode::Column) => strip_plan(&active, surface, gap, Axis::Vertical),
        (ViewMode::Multi, SubMode::Grid) => grid_plan(&active, surface, gap),
    }
}

/// Finds the column count in `1..=count` that maximizes the minimum tile
/// dimension. Ties go to the first (lowest) column count seen while
/// scanning ascending.
#[must_use]
pub fn best_grid_columns(count: usize, gap: f32, width: f32, height: f32) -> usize {
    debug_assert!(count > 0);

    let mut best_cols = 1;
    let mut best_size = f32::MIN;
    for cols in 1..=count {
        let rows = count.div_ceil(cols);
        let tile_w = (width - (cols - 1) as f32 * gap) / cols as f32;
        let tile_h = (height - (rows - 1) as f32 * gap) / rows as f32;
        let tile_size = tile_w.min(tile_h);
        if tile_size > best_size {
            best_size = tile_size;
            best_cols = cols;
        }
    }
    best_cols
}

enum Axis {
    Horizontal,
    Vertical,
}

fn single_plan(
    state: &ViewState,
    active: &[&crate::registry::Item],
    surface: Size,
) -> LayoutPlan {
    // The index invariant guarantees a valid position while the active
    // subset is non-empty.
    let current = active[state.current_index.min(active.len() - 1)];
    LayoutPlan {
        surface,
        slots: vec![Slot {
            content: SlotContent::Image(current.id),
            bounds: Rectangle::new(Point::ORIGIN, surface),
        }],
        grid: None,
    }
}

fn strip_plan(
    active: &[&crate::registry::Item],
    surface: Size,
    gap: f32,
    axis: Axis,
) -> LayoutPlan {
    let count = active.len();
    let major = match axis {
        Axis::Horizontal => surface.width,
        Axis::Vertical => surface.height,
    };
    let tile_major = ((major - (count - 1) as f32 * gap) / count as f32).max(0.0);

    let slots = active
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let offset = i as f32 * (tile_major + gap);
            let bounds = match axis {
                Axis::Horizontal => {
                    Rectangle::new(Point::new(offset, 0.0), Size::new(tile_major, surface.height))
                }
                Axis::Vertical => {
                    Rectangle::new(Point::new(0.0, offset), Size::new(surface.width, tile_major))
                }
            };
            Slot {
                content: SlotContent::Image(item.id),
                bounds,
            }
        })
        .collect();

    LayoutPlan {
        surface,
        slots,
        grid: None,
    }
}

fn grid_plan(active: &[&crate::registry::Item], surface: Size, gap: f32) -> LayoutPlan {
    let count = active.len();
    let columns = best_grid_columns(count, gap, surface.width, surface.height);
    let rows = count.div_ceil(columns);

    let tile_w = ((surface.width - (columns - 1) as f32 * gap) / columns as f32).max(0.0);
    let tile_h = ((surface.height - (rows - 1) as f32 * gap) / rows as f32).max(0.0);

    let slots = (0..rows * columns)
        .map(|i| {
            let row = i / columns;
            let col = i % columns;
            let bounds = Rectangle::new(
                Point::new(
                    col as f32 * (tile_w + gap),
                    row as f32 * (tile_h + gap),
                ),
                Size::new(tile_w, tile_h),
            );
            let content = match active.get(i) {
                Some(item) => SlotContent::Image(item.id),
                None => SlotContent::Filler,
            };
            Slot { content, bounds }
        })
        .collect();

    LayoutPlan {
        surface,
        slots,
        grid: Some(GridDims { columns, rows }),
    }
}
