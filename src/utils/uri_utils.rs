use std::collections::HashMap;

/// Helpers for splitting request URIs into the parts the validators consume
pub struct UriUtils;

impl UriUtils {
    /// Absolute path of an absolute or relative URI, sans query and fragment.
    /// An empty path is reported as `/`.
    pub fn path(uri: &str) -> &str {
        let without_fragment = uri.split('#').next().unwrap_or_default();
        let without_query = without_fragment.split('?').next().unwrap_or_default();

        let path = match without_query.find("://") {
            Some(scheme_end) => {
                let rest = &without_query[scheme_end + 3..];
                match rest.find('/') {
                    Some(path_start) => &rest[path_start..],
                    None => "",
                }
            }
            None => without_query,
        };

        if path.is_empty() {
            "/"
        } else {
            path
        }
    }

    /// URI sans query string and fragment, as quoted in diagnostics
    pub fn strip_query(uri: &str) -> &str {
        let without_fragment = uri.split('#').next().unwrap_or_default();
        without_fragment.split('?').next().unwrap_or_default()
    }

    pub fn query(uri: &str) -> Option<&str> {
        let without_fragment = uri.split('#').next().unwrap_or_default();
        without_fragment
            .split_once('?')
            .map(|(_, query)| query)
            .filter(|query| !query.is_empty())
    }

    /// Parse `a=1&b=two` into a map; the last value wins on duplicate keys
    pub fn parse_query(query: &str) -> HashMap<String, String> {
        let mut values = HashMap::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            values.insert(Self::decode_query_component(key), Self::decode_query_component(value));
        }
        values
    }

    pub fn decode_query_component(raw: &str) -> String {
        Self::decode_path_segment(&raw.replace('+', " "))
    }

    /// Percent-decode a path segment; undecodable input is returned unchanged
    pub fn decode_path_segment(raw: &str) -> String {
        urlencoding::decode(raw)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_of_relative_and_absolute_uris() {
        assert_eq!(UriUtils::path("/api/products?pageNo=1"), "/api/products");
        assert_eq!(UriUtils::path("https://example.org:8443/api/products/1"), "/api/products/1");
        assert_eq!(UriUtils::path("http://example.org"), "/");
        assert_eq!(UriUtils::path(""), "/");
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(UriUtils::strip_query("/api/foo?x=1#frag"), "/api/foo");
    }

    #[test]
    fn test_parse_query_last_value_wins() {
        let values = UriUtils::parse_query("pageNo=1&name=a+b%21&pageNo=2&flag");

        assert_eq!(values.get("pageNo"), Some(&"2".to_string()));
        assert_eq!(values.get("name"), Some(&"a b!".to_string()));
        assert_eq!(values.get("flag"), Some(&String::new()));
    }

    #[test]
    fn test_query_absent() {
        assert_eq!(UriUtils::query("/api/products"), None);
        assert_eq!(UriUtils::query("/api/products?"), None);
        assert_eq!(UriUtils::query("/api/products?a=1#x"), Some("a=1"));
    }

    #[test]
    fn test_decode_path_segment_keeps_plus() {
        assert_eq!(UriUtils::decode_path_segment("a+b%20c"), "a+b c");
    }
}
