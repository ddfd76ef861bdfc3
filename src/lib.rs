#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

mod logging;

pub mod api;
pub mod components;
pub mod config;
pub mod constants;
pub mod models;
pub mod time;
pub mod timeline;

pub use components::app::App;
