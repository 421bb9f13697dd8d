pub mod client;
pub mod detect;
pub mod error;

pub use client::{PageClient, PageSource};
pub use detect::StockDetector;
pub use error::{DetectError, FetchError};
