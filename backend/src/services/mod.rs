//! # Host services
//!
//! - `runtime_config`: `GET /config.json`, tells the SPA where the API lives.
//! - `assets`: everything else, served from the embedded frontend bundle with
//!   a fallback to `index.html` so client-side routes survive a reload.

pub mod assets;
pub mod runtime_config;
