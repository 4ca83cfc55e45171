//! Ratatui front-end split across logical submodules: central app state and
//! drawing, per-screen list state, input/confirmation state, shared layout
//! helpers, and the terminal event loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
