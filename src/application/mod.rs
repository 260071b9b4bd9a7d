pub mod admin;
pub mod auth;
pub mod navigation;
pub mod quiz;
pub mod shop;
