pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod id;
pub mod model;
pub mod services;

pub use app::{app, AppState};
