pub mod uri_utils;

pub use uri_utils::UriUtils;
