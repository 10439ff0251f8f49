pub mod classify;
pub mod client;
pub mod error;
pub mod normalize;
mod retry;

pub use classify::{hotel_query, SourceUrl};
pub use client::ProviderClient;
pub use error::{NormalizeError, ProviderError};
pub use normalize::normalize;
