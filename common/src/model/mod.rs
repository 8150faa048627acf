pub mod address;
pub mod console;
pub mod field;
pub mod template;
pub mod user;
