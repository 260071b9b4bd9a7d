mod forum;
mod participant;
mod product;
mod profile;
mod purchase;
mod quiz;
mod session;

pub use forum::*;
pub use participant::*;
pub use product::*;
pub use profile::*;
pub use purchase::*;
pub use quiz::*;
pub use session::*;
