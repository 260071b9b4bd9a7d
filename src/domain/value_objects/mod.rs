mod access_code;
mod auth_context;

pub use access_code::*;
pub use auth_context::*;
