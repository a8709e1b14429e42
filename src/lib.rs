// SPDX-License-Identifier: MPL-2.0
//! `twinview` is a multi-image comparison viewer built with the Iced GUI
//! framework.
//!
//! A set of images is loaded into a registry; the active ones are shown
//! side-by-side, in a grid, or overlaid in slice-compare mode, with
//! synchronized or per-image pan and zoom. The viewport engine lives in
//! [`viewport`]; everything else is the thin application shell around it.

#![doc(html_root_url = "https://docs.rs/twinview/0.2.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod media;
pub mod registry;
pub mod ui;
pub mod viewport;
