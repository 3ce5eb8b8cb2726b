pub mod fixture;
pub mod tracing;

pub use fixture::{Response, SiteFixture, gunzip, unbrotli};
pub use tracing::{CapturedEvent, EventLog, capture_events};
