//! Client for the Sinergia agenda API.
//!
//! All upstream access goes through [`SinergiaClient`], which memoizes JSON
//! responses in an owned [`cache::ResponseCache`] so repeated feed requests
//! don't hammer the booking backend.

pub mod cache;
pub mod client;

pub use cache::ResponseCache;
pub use client::{ApiConfig, DEFAULT_TTL, FetchOptions, SinergiaClient};
