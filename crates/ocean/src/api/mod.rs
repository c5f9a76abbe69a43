//! DigitalOcean REST API access.
//!
//! [`DoApi`] is the operation contract the rest of the crate is written
//! against; [`ApiClient`] is its HTTP implementation. Wire shapes live in
//! [`models`].

mod client;
pub mod models;
mod traits;

pub use client::ApiClient;
pub use traits::DoApi;
