//! Presentation layer for Tenki: the forecast controller, display text
//! rendering and the command set the terminal front end accepts.

pub mod command;
pub mod controller;
pub mod error_mapping;
pub mod render;

pub use command::{Command, CommandError};
pub use controller::{ForecastController, ViewState};
pub use error_mapping::JmaErrorExt;
