mod navigation;
mod notification;
pub mod pagination;

pub use navigation::*;
pub use notification::*;
pub use pagination::{Page, PageMarker, TableState};
