mod negotiate;
mod request_ctx;
mod send_ctx;

pub use negotiate::*;
pub use request_ctx::*;
pub use send_ctx::*;
