pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod ui;

// MVC architecture
pub mod model;
pub mod view;
pub mod controller;
