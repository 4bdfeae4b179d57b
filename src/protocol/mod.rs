pub mod message_types;
pub mod http_client;

pub use message_types::{normalize_media_type, HttpMethod, HeaderMap, HttpBody, HttpRequest, HttpResponse};
pub use http_client::HttpClient;
