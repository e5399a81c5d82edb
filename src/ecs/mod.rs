//! E-Commerce Service binding: request signing, dispatch, and response parsing.

pub mod client;
pub mod handler;
pub mod item;
pub mod locale;
pub mod request;
pub mod resultset;
pub mod signer;
pub mod transport;

pub use client::{EcsConnection, ItemSearch};
pub use handler::{parse_result_set, XmlRecord};
pub use item::Item;
pub use locale::Locale;
pub use request::{RequestBuilder, SignedRequest, Verb};
pub use resultset::{ApiError, ResultSet};
pub use signer::{Params, QuerySigner, SigV2Signer, SignedQuery};
pub use transport::{HttpTransport, RawResponse, Transport};
