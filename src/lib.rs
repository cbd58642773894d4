pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod keymap;
pub mod platform;
pub mod renderer;
pub mod security;
pub mod session;
pub mod theme;
