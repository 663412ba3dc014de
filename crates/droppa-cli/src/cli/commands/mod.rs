//! CLI command handlers, one file per command group.

mod device;
mod fetch;
mod send;
mod watch;

pub use device::{run_connect, run_register, run_unregister};
pub use fetch::run_fetch;
pub use send::run_send;
pub use watch::run_watch;
