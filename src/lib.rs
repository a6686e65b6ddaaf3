//! Pokedex TUI - endless catalog browser built on tui-dispatch
//!
//! The binary wires these modules to a terminal; tests drive them directly.

pub mod action;
pub mod api;
pub mod catalog;
pub mod components;
pub mod config;
pub mod effect;
pub mod logging;
pub mod palette;
pub mod reducer;
pub mod sprite;
pub mod state;
pub mod ui;
