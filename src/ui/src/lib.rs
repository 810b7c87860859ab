pub mod controller;
pub mod display;

pub use controller::{CliController, ControllerConfig};
