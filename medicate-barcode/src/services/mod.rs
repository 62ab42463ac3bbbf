pub mod barcode_resolver;
pub mod search_client;

pub use barcode_resolver::{BarcodeResolution, BarcodeResolver, ResolveError};
pub use search_client::{GoogleSearchClient, SearchError, SearchProvider};
