//! Ratatui front-end: a verse screen, a bookmark screen, and the modal
//! overlays that sit on top of them.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
