pub mod address;
pub mod admin;
pub mod auth;
pub mod console;
pub mod editor;
pub mod fill;
pub mod layout;
pub mod profile;
pub mod templates;
