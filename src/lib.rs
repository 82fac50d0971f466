//! proctop: live process table with signal delivery

pub mod app;
pub mod collector;
pub mod command;
pub mod config;
pub mod logger;
pub mod monitor;
mod prelude;
pub mod process;
pub mod render;
pub mod table;
