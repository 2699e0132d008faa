pub mod api;
pub mod reconciler;
pub mod ui;
