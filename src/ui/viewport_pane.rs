// SPDX-License-Identifier: MPL-2.0
//! The viewport rendering surface.
//!
//! A canvas program that turns the renderer's [`RenderPlan`] into pixels:
//! slots with their camera transforms, slice-compare layers with clip
//! regions and labels, marker handles, the HUD, and the empty placeholder.
//! Pointer and wheel input over the pane is forwarded as renderer messages;
//! cursor moves are reported even outside the pane bounds so drag sessions
//! survive leaving it.

use crate::media::MediaStore;
use crate::viewport::camera::Camera;
use crate::viewport::layout::SlotContent;
use crate::viewport::renderer::{Message, RenderPlan};
use crate::viewport::slice;
use crate::viewport::store::SlicingAxis;
use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::widget::Action;
use iced::{mouse, Color, Element, Length, Point, Rectangle, Size};

const BACKGROUND: Color = Color::from_rgb(0.07, 0.07, 0.07);
const SLOT_BACKGROUND: Color = Color::from_rgb(0.11, 0.11, 0.11);
const FILLER_TEXT: Color = Color::from_rgb(0.25, 0.25, 0.25);
const HUD_TEXT: Color = Color::from_rgb(0.6, 0.6, 0.6);
const HIGHLIGHT_BORDER: Color = Color::from_rgb(0.35, 0.70, 0.95);
const MARKER_HANDLE_RADIUS: f32 = 7.0;

/// Builds the pane widget for the current frame.
pub fn view<'a>(plan: &'a RenderPlan, media: &'a MediaStore) -> Element<'a, Message> {
    Canvas::new(ViewportPane { plan, media })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

struct ViewportPane<'a> {
    plan: &'a RenderPlan,
    media: &'a MediaStore,
}

impl canvas::Program<Message> for ViewportPane<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        // Keep the renderer's notion of the surface in sync with the
        // widget's actual bounds.
        if bounds.size() != self.plan.surface {
            return Some(Action::publish(Message::SurfaceResized(bounds.size())));
        }

        match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => cursor
                .position_in(bounds)
                .map(|position| Action::publish(Message::LeftPressed(position)).and_capture()),

            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                Some(Action::publish(Message::LeftReleased))
            }

            iced::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                // Pane-relative, possibly outside the bounds mid-drag.
                let relative = Point::new(position.x - bounds.x, position.y - bounds.y);
                Some(Action::publish(Message::CursorMoved(relative)))
            }

            iced::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let position = cursor.position_in(bounds)?;
                let notches = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => y / 20.0,
                };
                Some(
                    Action::publish(Message::WheelScrolled {
                        notches,
                        cursor: position,
                    })
                    .and_capture(),
                )
            }

            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        if self.plan.placeholder {
            self.draw_placeholder(&mut frame, bounds.size());
        } else if self.plan.layers.is_empty() {
            self.draw_slots(&mut frame);
        } else {
            self.draw_slice_stack(&mut frame, bounds.size());
        }

        self.draw_hud(&mut frame, bounds.size());

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) && !self.plan.placeholder {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

impl ViewportPane<'_> {
    fn draw_placeholder(&self, frame: &mut Frame, size: Size) {
        frame.fill_text(Text {
            content: "TWINVIEW".to_string(),
            position: Point::new(size.width / 2.0, size.height / 2.0 - 14.0),
            color: FILLER_TEXT,
            size: 28.0.into(),
            align_x: iced::widget::text::Alignment::Center,
            align_y: iced::alignment::Vertical::Center,
            ..Text::default()
        });
        frame.fill_text(Text {
            content: "Import images and activate them to start comparing".to_string(),
            position: Point::new(size.width / 2.0, size.height / 2.0 + 14.0),
            color: HUD_TEXT,
            size: 14.0.into(),
            align_x: iced::widget::text::Alignment::Center,
            align_y: iced::alignment::Vertical::Center,
            ..Text::default()
        });
    }

    fn draw_slots(&self, frame: &mut Frame) {
        for slot in &self.plan.slots {
            frame.fill_rectangle(slot.bounds.position(), slot.bounds.size(), SLOT_BACKGROUND);

            match slot.content {
                SlotContent::Filler => {
                    frame.fill_text(Text {
                        content: "TWINVIEW".to_string(),
                        position: slot.bounds.center(),
                        color: FILLER_TEXT,
                        size: 16.0.into(),
                        align_x: iced::widget::text::Alignment::Center,
                        align_y: iced::alignment::Vertical::Center,
                        ..Text::default()
                    });
                }
                SlotContent::Image(id) => {
                    if let Some(data) = self.media.peek(id) {
                        draw_image_in_region(frame, slot.bounds, slot.bounds, slot.camera, data);
                    }
                    if self.plan.highlight == Some(id) {
                        frame.stroke(
                            &Path::rectangle(slot.bounds.position(), slot.bounds.size()),
                            Stroke::default()
                                .with_width(2.0)
                                .with_color(HIGHLIGHT_BORDER),
                        );
                    }
                }
            }
        }
    }

    /// Slice compare: stacked clipped layers over the whole pane, painted
    /// back to front so lower z-orders end up underneath.
    fn draw_slice_stack(&self, frame: &mut Frame, size: Size) {
        let full = Rectangle::new(Point::ORIGIN, size);
        let camera = self
            .plan
            .slots
            .first()
            .map(|slot| slot.camera)
            .unwrap_or_default();

        for layer in self.plan.layers.iter().rev() {
            let clip = slice::clip_rectangle(full, self.plan.slicing_axis, layer.start, layer.end);
            if clip.width <= 0.0 || clip.height <= 0.0 {
                continue;
            }
            frame.fill_rectangle(clip.position(), clip.size(), SLOT_BACKGROUND);
            if let Some(data) = self.media.peek(layer.item) {
                draw_image_in_region(frame, clip, full, camera, data);
            }
        }

        for layer in &self.plan.layers {
            if let Some(label) = &layer.label {
                let position = match self.plan.slicing_axis {
                    SlicingAxis::Vertical => {
                        Point::new(size.width * label.anchor / 100.0, 14.0)
                    }
                    SlicingAxis::Horizontal => {
                        Point::new(14.0, size.height * label.anchor / 100.0)
                    }
                };
                frame.fill_text(Text {
                    content: label.text.clone(),
                    position,
                    color: Color::WHITE,
                    size: 13.0.into(),
                    ..Text::default()
                });
            }
        }

        for marker in &self.plan.markers {
            let (from, to, handle) = match self.plan.slicing_axis {
                SlicingAxis::Vertical => {
                    let x = size.width * marker.position / 100.0;
                    (
                        Point::new(x, 0.0),
                        Point::new(x, size.height),
                        Point::new(x, size.height / 2.0),
                    )
                }
                SlicingAxis::Horizontal => {
                    let y = size.height * marker.position / 100.0;
                    (
                        Point::new(0.0, y),
                        Point::new(size.width, y),
                        Point::new(size.width / 2.0, y),
                    )
                }
            };

            frame.stroke(
                &Path::line(from, to),
                Stroke::default().with_width(3.0).with_color(marker.color),
            );
            frame.fill(&Path::circle(handle, MARKER_HANDLE_RADIUS), marker.color);
            frame.stroke(
                &Path::circle(handle, MARKER_HANDLE_RADIUS),
                Stroke::default().with_width(1.5).with_color(Color::WHITE),
            );
        }
    }

    fn draw_hud(&self, frame: &mut Frame, size: Size) {
        if self.plan.placeholder {
            return;
        }

        if let Some(filename) = &self.plan.current_filename {
            frame.fill_text(Text {
                content: filename.clone(),
                position: Point::new(12.0, size.height - 44.0),
                color: Color::WHITE,
                size: 13.0.into(),
                ..Text::default()
            });
            frame.fill_text(Text {
                content: "← → navigate   Space reset".to_string(),
                position: Point::new(size.width - 220.0, size.height - 24.0),
                color: HUD_TEXT,
                size: 12.0.into(),
                ..Text::default()
            });
        }

        let sync = if self.plan.synchronized { "On" } else { "Off" };
        frame.fill_text(Text {
            content: format!("Sync {sync}"),
            position: Point::new(12.0, size.height - 24.0),
            color: HUD_TEXT,
            size: 12.0.into(),
            ..Text::default()
        });
    }
}

/// Draws an image centered in `anchor`, offset and scaled by the camera,
/// clipped to `clip`. The camera transform mirrors the plan contract:
/// translate by `(x, y)` from the anchor center, scale by `zoom`.
fn draw_image_in_region(
    frame: &mut Frame,
    clip: Rectangle,
    anchor: Rectangle,
    camera: Camera,
    data: &crate::media::ImageData,
) {
    let width = data.width as f32 * camera.zoom;
    let height = data.height as f32 * camera.zoom;
    let center = anchor.center();
    let top_left = Point::new(
        center.x + camera.x - width / 2.0,
        center.y + camera.y - height / 2.0,
    );

    let handle = data.handle.clone();
    frame.with_clip(clip, |frame| {
        // Coordinates inside the clip are relative to its origin.
        let local = Rectangle::new(
            Point::new(top_left.x - clip.x, top_left.y - clip.y),
            Size::new(width, height),
        );
        frame.draw_image(local, canvas::Image::new(handle));
    });
}
