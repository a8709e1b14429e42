// SPDX-License-Identifier: MPL-2.0
//! Sidebar: the image list with active toggles and the view controls.
//!
//! Pure view code; every interaction is forwarded as a [`Message`] and
//! handled by the application, which routes it to the registry or the
//! state store. Nothing here mutates state.

use crate::config::MAX_GAP_PX;
use crate::registry::{ImageId, Item};
use crate::viewport::store::{SlicingAxis, SubMode, ViewMode};
use iced::widget::{
    button, checkbox, container, radio, rule, scrollable, slider, text, Column, Row,
};
use iced::{Element, Length};

/// Messages emitted by the sidebar controls.
#[derive(Debug, Clone)]
pub enum Message {
    ToggleItem(ImageId),
    SetViewMode(ViewMode),
    SetSubMode(SubMode),
    GapChanged(u16),
    HighlightToggled(bool),
    SyncToggled(bool),
    AddSlider,
    RemoveSlider,
    AxisSelected(SlicingAxis),
    SliceLabelsToggled(bool),
    ImportPressed,
    DeactivateAllPressed,
    PurgeInactivePressed,
}

/// Everything the sidebar needs to render.
pub struct ViewModel<'a> {
    pub items: &'a [Item],
    pub view_mode: ViewMode,
    pub sub_mode: SubMode,
    pub gap: u16,
    pub show_highlight: bool,
    pub synchronized: bool,
    pub slicing_axis: SlicingAxis,
    pub show_slice_labels: bool,
    pub slider_count: usize,
    pub active_count: usize,
}

pub fn view(model: ViewModel<'_>) -> Element<'_, Message> {
    let content = Column::new()
        .spacing(16)
        .padding(12)
        .push(scene_section(&model))
        .push(rule::horizontal(1))
        .push(mode_section(&model))
        .push(rule::horizontal(1))
        .push(display_section(&model));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// The scene list: one row per item with its active toggle, plus the
/// registry-level actions.
fn scene_section<'a>(model: &ViewModel<'a>) -> Element<'a, Message> {
    let mut list = Column::new().spacing(6);
    // Newest entries first, mirroring import order top-down.
    for item in model.items.iter().rev() {
        list = list.push(
            Row::new()
                .spacing(8)
                .push(text(item.filename.as_str()).size(13).width(Length::Fill))
                .push(
                    checkbox(item.active)
                        .label("")
                        .on_toggle({
                            let id = item.id;
                            move |_| Message::ToggleItem(id)
                        })
                        .size(16),
                ),
        );
    }

    let actions = Row::new()
        .spacing(8)
        .push(button(text("Import…").size(13)).on_press(Message::ImportPressed))
        .push(button(text("Clear all").size(13)).on_press(Message::DeactivateAllPressed))
        .push(button(text("Purge").size(13)).on_press(Message::PurgeInactivePressed));

    Column::new()
        .spacing(10)
        .push(text("Scene").size(16))
        .push(scrollable(list).height(Length::FillPortion(2)))
        .push(actions)
        .into()
}

/// View mode switcher plus the controls specific to the current mode.
fn mode_section<'a>(model: &ViewModel<'a>) -> Element<'a, Message> {
    let mode_button = |label: &'static str, mode: ViewMode, current: ViewMode| {
        let styled = if mode == current {
            button(text(label).size(13)).style(button::primary)
        } else {
            button(text(label).size(13)).style(button::secondary)
        };
        styled.on_press(Message::SetViewMode(mode))
    };

    let mut section = Column::new().spacing(10).push(text("Mode").size(16)).push(
        Row::new()
            .spacing(8)
            .push(mode_button("Multi", ViewMode::Multi, model.view_mode))
            .push(mode_button("Single", ViewMode::Single, model.view_mode)),
    );

    section = match model.view_mode {
        ViewMode::Multi => section.push(sub_mode_row(model)),
        ViewMode::Single => section.push(slice_controls(model)),
    };

    section.into()
}

fn sub_mode_row<'a>(model: &ViewModel<'a>) -> Element<'a, Message> {
    let sub_button = |label: &'static str, sub: SubMode, current: SubMode| {
        let styled = if sub == current {
            button(text(label).size(13)).style(button::primary)
        } else {
            button(text(label).size(13)).style(button::secondary)
        };
        styled.on_press(Message::SetSubMode(sub))
    };

    Row::new()
        .spacing(8)
        .push(sub_button("Row", SubMode::Row, model.sub_mode))
        .push(sub_button("Column", SubMode::Column, model.sub_mode))
        .push(sub_button("Grid", SubMode::Grid, model.sub_mode))
        .into()
}

/// Slice-compare controls shown in Single mode.
fn slice_controls<'a>(model: &ViewModel<'a>) -> Element<'a, Message> {
    let can_add = model.slider_count + 1 < model.active_count;

    let mut add = button(text("+ Slider").size(13));
    if can_add {
        add = add.on_press(Message::AddSlider);
    }
    let mut remove = button(text("− Slider").size(13));
    if model.slider_count > 0 {
        remove = remove.on_press(Message::RemoveSlider);
    }

    Column::new()
        .spacing(8)
        .push(
            Row::new()
                .spacing(8)
                .push(add)
                .push(remove)
                .push(text(format!("{}", model.slider_count)).size(13)),
        )
        .push(
            Row::new()
                .spacing(12)
                .push(radio(
                    "Vertical",
                    SlicingAxis::Vertical,
                    Some(model.slicing_axis),
                    Message::AxisSelected,
                ))
                .push(radio(
                    "Horizontal",
                    SlicingAxis::Horizontal,
                    Some(model.slicing_axis),
                    Message::AxisSelected,
                )),
        )
        .push(
            checkbox(model.show_slice_labels)
                .label("Slice labels")
                .on_toggle(Message::SliceLabelsToggled)
                .size(16),
        )
        .into()
}

/// Display preferences: gap, highlight, synchronization.
fn display_section<'a>(model: &ViewModel<'a>) -> Element<'a, Message> {
    let mut sync = checkbox(model.synchronized).label("Synchronized cameras").size(16);
    // Single mode pins synchronization on; the toggle only works in Multi.
    if model.view_mode == ViewMode::Multi {
        sync = sync.on_toggle(Message::SyncToggled);
    }

    Column::new()
        .spacing(10)
        .push(text("Display").size(16))
        .push(
            Row::new()
                .spacing(8)
                .push(text("Gap").size(13))
                .push(slider(0..=MAX_GAP_PX, model.gap, Message::GapChanged))
                .push(text(format!("{}px", model.gap)).size(13)),
        )
        .push(
            checkbox(model.show_highlight)
                .label("Highlight hovered")
                .on_toggle(Message::HighlightToggled)
                .size(16),
        )
        .push(sync)
        .into()
}
