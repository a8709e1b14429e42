// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Notifications appear temporarily to inform the user about actions
//! (import success, purge results, decode errors) without blocking
//! interaction. At most [`MAX_VISIBLE`] toasts are shown; the rest queue up
//! and are promoted as space frees. Success and info toasts auto-dismiss,
//! errors stay until dismissed manually.

use iced::alignment::Horizontal;
use iced::widget::{button, container, text, Column, Row};
use iced::{Background, Color, Element, Length};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of notifications visible at once.
const MAX_VISIBLE: usize = 3;

const SUCCESS_COLOR: Color = Color::from_rgb(0.16, 0.55, 0.32);
const INFO_COLOR: Color = Color::from_rgb(0.22, 0.42, 0.69);
const WARNING_COLOR: Color = Color::from_rgb(0.80, 0.52, 0.13);
const ERROR_COLOR: Color = Color::from_rgb(0.72, 0.22, 0.22);

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level determines display duration and visual styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed successfully (green, 3s duration).
    #[default]
    Success,
    /// Informational message (blue, 3s duration).
    Info,
    /// Warning that doesn't block operation (orange, 5s duration).
    Warning,
    /// Error requiring attention (red, manual dismiss).
    Error,
}

impl Severity {
    /// Returns the background color for this severity level.
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Severity::Success => SUCCESS_COLOR,
            Severity::Info => INFO_COLOR,
            Severity::Warning => WARNING_COLOR,
            Severity::Error => ERROR_COLOR,
        }
    }

    /// Returns the auto-dismiss duration for this severity.
    /// Returns `None` for errors (manual dismiss required).
    #[must_use]
    pub fn auto_dismiss_duration(&self) -> Option<Duration> {
        match self {
            Severity::Success | Severity::Info => Some(Duration::from_secs(3)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Error => None,
        }
    }
}

/// A notification to be displayed to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    message: String,
    created_at: Instant,
}

impl Notification {
    /// Creates a new notification with the given severity and message.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this notification's display time has expired.
    #[must_use]
    pub fn should_auto_dismiss(&self) -> bool {
        match self.severity.auto_dismiss_duration() {
            Some(duration) => self.created_at.elapsed() >= duration,
            None => false,
        }
    }
}

/// Messages for notification state changes.
#[derive(Debug, Clone)]
pub enum Message {
    /// Dismiss a specific notification by ID.
    Dismiss(NotificationId),
}

/// Manages the notification queue and visible notifications.
#[derive(Debug, Default)]
pub struct Manager {
    /// Currently visible notifications (newest first).
    visible: VecDeque<Notification>,
    /// Queued notifications waiting to be displayed.
    queue: VecDeque<Notification>,
}

impl Manager {
    /// Creates a new empty notification manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a new notification to be displayed.
    ///
    /// If fewer than `MAX_VISIBLE` notifications are showing, it's displayed
    /// immediately. Otherwise, it's added to the queue and shown when space
    /// becomes available.
    pub fn push(&mut self, notification: Notification) {
        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_front(notification);
        } else {
            self.queue.push_back(notification);
        }
    }

    /// Dismisses a notification by its ID.
    ///
    /// Returns `true` if the notification was found and removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_from_queue();
            return true;
        }

        if let Some(pos) = self.queue.iter().position(|n| n.id() == id) {
            self.queue.remove(pos);
            return true;
        }

        false
    }

    /// Processes a tick, dismissing any notifications that have expired.
    pub fn tick(&mut self) {
        let to_dismiss: Vec<NotificationId> = self
            .visible
            .iter()
            .filter(|n| n.should_auto_dismiss())
            .map(Notification::id)
            .collect();

        for id in to_dismiss {
            self.dismiss(id);
        }
    }

    /// Handles a notification message.
    pub fn update(&mut self, message: Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(id);
            }
        }
    }

    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            let Some(next) = self.queue.pop_front() else {
                break;
            };
            self.visible.push_front(next);
        }
    }

    /// Whether any notification is visible or queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.queue.is_empty()
    }

    /// Number of visible notifications.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Renders the visible toasts as a column, newest on top.
    pub fn view(&self) -> Element<'_, Message> {
        let mut column = Column::new().spacing(8).align_x(Horizontal::Right);

        for notification in &self.visible {
            let color = notification.severity().color();
            let body = Row::new()
                .spacing(12)
                .push(text(notification.message()).size(14))
                .push(
                    button(text("✕").size(12))
                        .on_press(Message::Dismiss(notification.id()))
                        .style(button::text)
                        .padding(0),
                );

            column = column.push(
                container(body)
                    .padding([8.0, 12.0])
                    .style(move |_theme| container::Style {
                        background: Some(Background::Color(color)),
                        text_color: Some(Color::WHITE),
                        border: iced::border::rounded(6),
                        ..container::Style::default()
                    }),
            );
        }

        container(column).width(Length::Shrink).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_shows_up_to_the_visible_limit() {
        let mut manager = Manager::new();
        for i in 0..5 {
            manager.push(Notification::new(Severity::Info, format!("toast {i}")));
        }
        assert_eq!(manager.visible_count(), MAX_VISIBLE);
        assert!(!manager.is_empty());
    }

    #[test]
    fn dismiss_promotes_the_next_queued_toast() {
        let mut manager = Manager::new();
        let mut ids = Vec::new();
        for i in 0..4 {
            let notification = Notification::new(Severity::Info, format!("toast {i}"));
            ids.push(notification.id());
            manager.push(notification);
        }

        assert!(manager.dismiss(ids[0]));
        assert_eq!(manager.visible_count(), MAX_VISIBLE);
    }

    #[test]
    fn dismiss_unknown_id_returns_false() {
        let mut manager = Manager::new();
        assert!(!manager.dismiss(NotificationId::new()));
    }

    #[test]
    fn errors_never_auto_dismiss() {
        let notification = Notification::new(Severity::Error, "boom");
        assert!(!notification.should_auto_dismiss());
    }

    #[test]
    fn tick_keeps_fresh_toasts() {
        let mut manager = Manager::new();
        manager.push(Notification::new(Severity::Success, "saved"));
        manager.tick();
        assert_eq!(manager.visible_count(), 1);
    }
}
