//! Terminal front-end for the Zoner document Q&A backend.
mod app;
mod config;
mod effects;
mod input;
mod render;

pub use app::run_app;
