// SPDX-License-Identifier: MPL-2.0
//! User interface modules: the sidebar, the viewport surface, and toasts.

pub mod notifications;
pub mod sidebar;
pub mod viewport_pane;
