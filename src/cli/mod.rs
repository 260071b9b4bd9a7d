//! Command-line front end over the application use cases

mod args;
mod commands;
mod console;
mod session;

pub use args::*;
pub use commands::run;
pub use console::{ConsoleNavigator, ConsoleNotifier};
pub use session::current_context;
