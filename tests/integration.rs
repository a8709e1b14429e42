// SPDX-License-Identifier: MPL-2.0
//! Cross-module scenarios: registry → store → layout → slice pipeline.

use std::path::{Path, PathBuf};
use tempfile::tempdir;
use twinview::config::{self, Config};
use twinview::registry::Registry;
use twinview::viewport::layout::{self, SlotContent};
use twinview::viewport::slice;
use twinview::viewport::store::{StateStore, SubMode, ViewMode};
use iced::Size;

fn create_test_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"fake image data").expect("failed to create test file");
    path
}

fn registry_with(count: usize, dir: &Path) -> Registry {
    let paths: Vec<PathBuf> = (0..count)
        .map(|i| create_test_image(dir, &format!("img{i:02}.png")))
        .collect();
    let mut registry = Registry::new();
    assert_eq!(registry.import_files(&paths), count);
    registry
}

#[test]
fn registry_toggles_flow_through_store_layout_and_slice() {
    let dir = tempdir().expect("temp dir");
    let mut registry = registry_with(4, dir.path());
    let mut store = StateStore::default();
    store.set_items(registry.items());

    // All four active in a grid.
    store.set_sub_mode(SubMode::Grid);
    let plan = layout::compute_plan(store.state(), Size::new(800.0, 600.0));
    assert_eq!(
        plan.slots
            .iter()
            .filter(|s| matches!(s.content, SlotContent::Image(_)))
            .count(),
        4
    );

    // Slice compare over the active subset.
    store.set_view_mode(ViewMode::Single);
    store.add_slider();
    store.add_slider();
    let layers = slice::compute_layers(store.state());
    assert_eq!(layers.len(), 3);

    // Deactivating two items shrinks the slider list to fit and the layer
    // stack with it.
    let ids: Vec<_> = registry.items().iter().map(|i| i.id).collect();
    registry.toggle(ids[0]);
    registry.toggle(ids[1]);
    store.set_items(registry.items());

    let state = store.state();
    assert_eq!(state.active_count(), 2);
    assert!(state.sliders.len() <= 1);
    let layers = slice::compute_layers(state);
    assert!(layers.len() <= 2);
}

#[test]
fn purging_everything_reaches_the_placeholder_state() {
    let dir = tempdir().expect("temp dir");
    let mut registry = registry_with(3, dir.path());
    let mut store = StateStore::default();
    store.set_items(registry.items());
    store.add_slider();

    registry.deactivate_all();
    assert_eq!(registry.purge_inactive(), 3);
    store.set_items(registry.items());

    let state = store.state();
    assert_eq!(state.active_count(), 0);
    assert_eq!(state.current_index, 0);
    assert!(state.sliders.is_empty());

    // An empty active set is a defined outcome, not an error.
    let plan = layout::compute_plan(state, Size::new(800.0, 600.0));
    assert!(plan.is_empty());
    assert!(slice::compute_layers(state).is_empty());
}

#[test]
fn navigation_wraps_and_keeps_slice_layers_consistent() {
    let dir = tempdir().expect("temp dir");
    let registry = registry_with(3, dir.path());
    let mut store = StateStore::default();
    store.set_items(registry.items());
    store.set_view_mode(ViewMode::Single);
    store.add_slider();

    // index 2 → advance wraps to 0.
    store.advance();
    store.advance();
    assert_eq!(store.state().current_index, 2);
    store.advance();
    assert_eq!(store.state().current_index, 0);
    store.retreat();
    assert_eq!(store.state().current_index, 2);

    // Front layer always shows the current image; the second walks back.
    let layers = slice::compute_layers(store.state());
    let active: Vec<_> = store.state().active_items().collect();
    assert_eq!(layers[0].item, active[2].id);
    assert_eq!(layers[1].item, active[1].id);
}

#[test]
fn grid_search_matches_the_brute_force_optimum() {
    for (count, gap, width, height) in [
        (7_usize, 10.0_f32, 800.0_f32, 600.0_f32),
        (3, 5.0, 1280.0, 720.0),
        (12, 0.0, 500.0, 900.0),
        (1, 20.0, 300.0, 300.0),
    ] {
        let chosen = layout::best_grid_columns(count, gap, width, height);

        let mut best_cols = 1;
        let mut best_size = f32::MIN;
        for cols in 1..=count {
            let rows = count.div_ceil(cols);
            let tile_w = (width - (cols - 1) as f32 * gap) / cols as f32;
            let tile_h = (height - (rows - 1) as f32 * gap) / rows as f32;
            if tile_w.min(tile_h) > best_size {
                best_size = tile_w.min(tile_h);
                best_cols = cols;
            }
        }
        assert_eq!(chosen, best_cols, "count={count} gap={gap}");
    }
}

#[test]
fn synchronization_snapshot_survives_a_full_round_trip() {
    use twinview::viewport::Camera;

    let dir = tempdir().expect("temp dir");
    let registry = registry_with(2, dir.path());
    let ids: Vec<_> = registry.items().iter().map(|i| i.id).collect();

    let mut store = StateStore::default();
    store.set_items(registry.items());

    store.set_synchronized(false);
    store.update_camera(Some(ids[0]), Camera::new(10.0, 0.0, 2.0));
    store.update_camera(Some(ids[1]), Camera::new(0.0, -4.0, 0.5));

    store.set_synchronized(true);
    let shared = store.state().global_camera;
    store.set_synchronized(false);

    for id in &ids {
        assert_eq!(store.state().individual_cameras[id], shared);
    }
}

#[test]
fn config_round_trip_preserves_viewer_preferences() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("settings.toml");

    let mut saved = Config::default();
    saved.gap = Some(15);
    saved.sub_mode = Some(SubMode::Grid);
    config::save_to_path(&saved, &path).expect("save");

    let loaded = config::load_from_path(&path).expect("load");
    assert_eq!(loaded.gap, Some(15));
    assert_eq!(loaded.sub_mode, Some(SubMode::Grid));
}
