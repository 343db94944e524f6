//! CARE Lab command-line front-end and console menu.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod menu;
pub mod render;
