//! Request path to file resolution and response composition.

mod error;
pub mod handler;
mod render;
mod resolve;
mod response;
#[cfg(test)]
mod tests;

pub use error::SendError;
pub use handler::{SendOutcome, send, send_with};
pub use resolve::Precompressed;
pub use response::StaticBody;
