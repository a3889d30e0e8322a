//! UI layer for the tracker: app shell and widgets.

pub mod app;
pub mod widgets;

pub use app::{TrackerApp, APP_TITLE};
