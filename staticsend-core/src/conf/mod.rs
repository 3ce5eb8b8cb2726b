mod error;
mod loader;
mod options;
pub mod spec;

pub use error::ConfigError;
pub use loader::{load_options, parse_options};
pub use options::{SendOptions, SetHeaders};
