pub mod client;
pub mod decode;
pub mod error;
pub mod http;
pub mod traits;

pub use client::{CatalogClient, ALL_GENRES};
pub use decode::Decoded;
pub use error::{CatalogError, DecodeError, TransportError};
pub use http::{FailoverClient, ReqwestTransport, with_authority};
pub use traits::{Transport, TransportResponse};
