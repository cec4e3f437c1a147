pub mod config;
pub mod digest;
pub mod error;
pub mod feed;
pub mod filter;
pub mod pdf;

pub use config::AppConfig;
pub use digest::{build_digest, build_digest_from_bytes, Digest, DigestEntry, DigestOptions};
pub use error::{Error, FetchError, Result};
