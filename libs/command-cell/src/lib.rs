//! Every user action as one typed command, dispatched against the clinic state.

pub mod commands;
pub mod dispatch;
pub mod handlers;
pub mod router;

pub use commands::{Command, Outcome};
pub use dispatch::Dispatcher;
pub use router::command_routes;
