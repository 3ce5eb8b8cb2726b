pub mod cli;
pub mod conf;
pub mod ctx;
pub mod fs;
pub mod logging;
pub mod static_files;

pub use conf::{ConfigError, SendOptions};
pub use ctx::{RequestContext, SendCtx};
pub use fs::{FileKind, FileStat, FileSystem, TokioFs};
pub use static_files::{Precompressed, SendError, SendOutcome, StaticBody, send, send_with};
