// Configuration loading

pub mod settings;

pub use settings::{IdScheme, LogLevel, Settings};
