//! Types shared by the Spotify proxy crates

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
