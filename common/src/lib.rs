//! Platform-independent core of the Dooform client: the field-definition
//! model and pipeline, form state, REST payloads, and the error taxonomy.
//! Shared by the Yew frontend and the static host.

pub mod address;
pub mod auth;
pub mod errors;
pub mod fields;
pub mod form;
pub mod model;
pub mod requests;
