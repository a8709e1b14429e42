// SPDX-License-Identifier: MPL-2.0
//! Application orchestrator: owns the registry, the state store, the
//! renderer, and the toast manager, and wires them to the Iced runtime.

use crate::config::{self, Config, DEFAULT_GAP_PX};
use crate::error::Error;
use crate::media::{self, ImageData, MediaStore};
use crate::registry::{ImageId, Registry, IMAGE_EXTENSIONS};
use crate::ui::notifications::{self, Manager, Notification, Severity};
use crate::ui::{sidebar, viewport_pane};
use crate::viewport::renderer::{self, RenderPlan};
use crate::viewport::store::{StateStore, ViewState};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{container, Row, Stack};
use iced::{event, keyboard, window, Element, Length, Size, Subscription, Task};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const WINDOW_DEFAULT_WIDTH: u32 = 1200;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
pub const MIN_WINDOW_WIDTH: u32 = 800;
pub const MIN_WINDOW_HEIGHT: u32 = 600;

/// Fixed sidebar width; the viewport pane gets the rest of the window.
const SIDEBAR_WIDTH: f32 = 280.0;

/// How often toast auto-dismiss timers are checked.
const TOAST_TICK: Duration = Duration::from_millis(500);

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Optional directory to scan for images on startup.
    pub directory: Option<PathBuf>,
    /// Image paths to register on startup.
    pub files: Vec<PathBuf>,
}

pub struct App {
    config: Config,
    registry: Registry,
    store: StateStore,
    renderer: renderer::State,
    media: MediaStore,
    notifications: Manager,
    plan: RenderPlan,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("registered", &self.registry.len())
            .field("active", &self.registry.active_count())
            .finish()
    }
}

/// Top-level messages consumed by [`App::update`]. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Sidebar(sidebar::Message),
    Viewport(renderer::Message),
    Notifications(notifications::Message),
    WindowResized(Size),
    FilesPicked(Option<Vec<PathBuf>>),
    ImageLoaded {
        id: ImageId,
        result: Result<ImageData, Error>,
    },
    /// Periodic tick for toast auto-dismiss.
    Tick,
}

/// Builds the window settings.
#[must_use]
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(Size::new(MIN_WINDOW_WIDTH as f32, MIN_WINDOW_HEIGHT as f32)),
        ..window::Settings::default()
    }
}

fn pane_size(window: Size) -> Size {
    Size::new((window.width - SIDEBAR_WIDTH).max(0.0), window.height)
}

impl App {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let config = config::load().unwrap_or_else(|err| {
            log::warn!("failed to load preferences: {err}");
            Config::default()
        });

        let state = ViewState {
            gap: config.gap.unwrap_or(DEFAULT_GAP_PX),
            synchronized: config.synchronized.unwrap_or(true),
            show_highlight: config.show_highlight.unwrap_or(false),
            sub_mode: config.sub_mode.unwrap_or_default(),
            slicing_axis: config.slicing_axis.unwrap_or_default(),
            show_slice_labels: config.show_slice_labels.unwrap_or(true),
            ..ViewState::default()
        };
        let mut store = StateStore::new(state);
        let renderer = renderer::State::new(&mut store);

        let mut registry = Registry::new();
        if let Some(directory) = &flags.directory {
            match registry.scan_directory(directory) {
                Ok(count) => log::info!("registered {count} images from {}", directory.display()),
                Err(err) => log::warn!("could not scan {}: {err}", directory.display()),
            }
        }
        if !flags.files.is_empty() {
            let count = registry.import_files(&flags.files);
            log::info!("registered {count} images from the command line");
        }

        let mut app = Self {
            config,
            registry,
            store,
            renderer,
            media: MediaStore::new(),
            notifications: Manager::new(),
            plan: RenderPlan::default(),
        };
        let load = app.sync_items();
        app.plan = app.renderer.render_plan(app.store.state());

        // Seed the viewport surface with the actual window size; the pane
        // keeps it in sync afterwards.
        let size = window::latest()
            .and_then(window::size)
            .map(Message::WindowResized);

        (app, Task::batch([load, size]))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle_message(message);
        self.plan = self.renderer.render_plan(self.store.state());
        task
    }

    fn handle_message(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Sidebar(message) => self.handle_sidebar(message),

            Message::Viewport(message) => {
                self.renderer.handle(message, &mut self.store);
                Task::none()
            }

            Message::Notifications(message) => {
                self.notifications.update(message);
                Task::none()
            }

            Message::WindowResized(size) => {
                self.renderer.handle(
                    renderer::Message::SurfaceResized(pane_size(size)),
                    &mut self.store,
                );
                Task::none()
            }

            Message::FilesPicked(Some(paths)) => {
                let imported = self.registry.import_files(&paths);
                if imported > 0 {
                    self.toast(Severity::Success, format!("Imported files {imported}"));
                } else {
                    self.toast(Severity::Error, "Unsupported media type");
                }
                self.sync_items()
            }
            Message::FilesPicked(None) => Task::none(),

            Message::ImageLoaded { id, result } => {
                match result {
                    Ok(data) => self.media.insert(id, data),
                    Err(err) => {
                        self.media.clear_pending(id);
                        let filename = self
                            .registry
                            .entry(id)
                            .map(|entry| entry.filename.clone())
                            .unwrap_or_else(|| format!("#{}", id.value()));
                        log::warn!("failed to load {filename}: {err}");
                        self.toast(Severity::Error, format!("Failed to load {filename}"));
                    }
                }
                Task::none()
            }

            Message::Tick => {
                self.notifications.tick();
                Task::none()
            }
        }
    }

    fn handle_sidebar(&mut self, message: sidebar::Message) -> Task<Message> {
        match message {
            sidebar::Message::ToggleItem(id) => {
                self.registry.toggle(id);
                self.sync_items()
            }

            sidebar::Message::SetViewMode(mode) => {
                self.store.set_view_mode(mode);
                Task::none()
            }

            sidebar::Message::SetSubMode(sub_mode) => {
                self.store.set_sub_mode(sub_mode);
                self.config.sub_mode = Some(sub_mode);
                self.persist_preferences();
                Task::none()
            }

            sidebar::Message::GapChanged(gap) => {
                self.store.set_gap(gap);
                self.config.gap = Some(gap);
                self.persist_preferences();
                Task::none()
            }

            sidebar::Message::HighlightToggled(show) => {
                self.store.set_highlight(show);
                self.config.show_highlight = Some(show);
                self.persist_preferences();
                Task::none()
            }

            sidebar::Message::SyncToggled(synchronized) => {
                self.store.set_synchronized(synchronized);
                self.config.synchronized = Some(synchronized);
                self.persist_preferences();
                Task::none()
            }

            sidebar::Message::AddSlider => {
                self.store.add_slider();
                Task::none()
            }

            sidebar::Message::RemoveSlider => {
                self.store.remove_slider();
                Task::none()
            }

            sidebar::Message::AxisSelected(axis) => {
                self.store.set_slicing_axis(axis);
                self.config.slicing_axis = Some(axis);
                self.persist_preferences();
                Task::none()
            }

            sidebar::Message::SliceLabelsToggled(visible) => {
                self.store.set_slice_labels_visible(visible);
                self.config.show_slice_labels = Some(visible);
                self.persist_preferences();
                Task::none()
            }

            sidebar::Message::ImportPressed => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .add_filter("Images", IMAGE_EXTENSIONS)
                        .set_title("Import images")
                        .pick_files()
                        .await
                        .map(|handles| {
                            handles
                                .into_iter()
                                .map(|handle| handle.path().to_path_buf())
                                .collect()
                        })
                },
                Message::FilesPicked,
            ),

            sidebar::Message::DeactivateAllPressed => {
                let deactivated = self.registry.deactivate_all();
                if deactivated > 0 {
                    self.toast(Severity::Success, "Workspace cleared");
                } else {
                    self.toast(Severity::Info, "No active selection");
                }
                self.sync_items()
            }

            sidebar::Message::PurgeInactivePressed => {
                let purged = self.registry.purge_inactive();
                if purged > 0 {
                    self.toast(Severity::Success, format!("Purged {purged} inactive assets"));
                } else {
                    self.toast(Severity::Info, "No inactive assets found");
                }
                self.sync_items()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let state = self.store.state();

        let sidebar = sidebar::view(sidebar::ViewModel {
            items: &state.items,
            view_mode: state.view_mode,
            sub_mode: state.sub_mode,
            gap: state.gap,
            show_highlight: state.show_highlight,
            synchronized: state.synchronized,
            slicing_axis: state.slicing_axis,
            show_slice_labels: state.show_slice_labels,
            slider_count: state.sliders.len(),
            active_count: state.active_count(),
        })
        .map(Message::Sidebar);

        let pane = viewport_pane::view(&self.plan, &self.media).map(Message::Viewport);

        let content = Row::new()
            .push(
                container(sidebar)
                    .width(Length::Fixed(SIDEBAR_WIDTH))
                    .height(Length::Fill),
            )
            .push(
                container(pane)
                    .width(Length::Fill)
                    .height(Length::Fill),
            );

        let toasts = container(self.notifications.view().map(Message::Notifications))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Right)
            .align_y(Vertical::Bottom)
            .padding(16);

        Stack::new().push(content).push(toasts).into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let events = event::listen_with(|event, status, _window| match event {
            event::Event::Window(window::Event::Resized(size)) => {
                Some(Message::WindowResized(size))
            }
            event::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => match status {
                // Text widgets capture their own input; only uncaptured
                // keys drive the viewport.
                event::Status::Ignored => {
                    Some(Message::Viewport(renderer::Message::KeyPressed(key)))
                }
                event::Status::Captured => None,
            },
            _ => None,
        });

        if self.notifications.is_empty() {
            events
        } else {
            Subscription::batch([
                events,
                iced::time::every(TOAST_TICK).map(|_| Message::Tick),
            ])
        }
    }

    /// Feeds the registry projection into the store and starts loads for
    /// any active image that is not decoded yet.
    fn sync_items(&mut self) -> Task<Message> {
        self.store.set_items(self.registry.items());

        let wanted: Vec<(ImageId, PathBuf)> = self
            .store
            .state()
            .active_items()
            .filter(|item| !self.media.is_ready_or_pending(item.id))
            .filter_map(|item| {
                self.registry
                    .entry(item.id)
                    .map(|entry| (item.id, entry.path.clone()))
            })
            .collect();

        let mut tasks = Vec::new();
        for (id, path) in wanted {
            self.media.mark_pending(id);
            tasks.push(Task::perform(
                media::load_image_async(path),
                move |result| Message::ImageLoaded { id, result },
            ));
        }
        Task::batch(tasks)
    }

    fn toast(&mut self, severity: Severity, message: impl Into<String>) {
        self.notifications.push(Notification::new(severity, message));
    }

    fn persist_preferences(&self) {
        if let Err(err) = config::save(&self.config) {
            log::warn!("failed to save preferences: {err}");
        }
    }
}
