mod check;
mod resolve;

pub use check::*;
pub use resolve::*;
