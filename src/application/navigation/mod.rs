//! Navigation chrome: which entries a user sees, and where they land

mod menu;

pub use menu::*;
