//! Admin tables for products and forum categories
//!
//! Errors carry the exact inline message the table shows under its form.

mod categories;
mod products;

pub use categories::*;
pub use products::*;

use crate::domain::repositories::RepositoryError;

pub const ADMIN_PAGE_SIZE: usize = 5;

/// The store's own message, or `fallback` when it gave none
fn store_message(error: &RepositoryError, fallback: &str) -> String {
    let message = error.message().trim();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}
