//! Cursor pagination via the response `Link` header.

/// One page of results plus the cursor to the next page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` when this is the last page.
    pub next_page_info: Option<String>,
}

impl<T> Page<T> {
    /// An empty final page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_page_info: None,
        }
    }
}

/// Cursors extracted from a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// `page_info` cursor of the `rel="next"` link.
    pub next: Option<String>,
    /// `page_info` cursor of the `rel="previous"` link.
    pub previous: Option<String>,
}

/// Parse a Shopify `Link` header into pagination cursors.
///
/// Headers look like:
/// `<https://shop.myshopify.com/admin/api/2023-10/products.json?page_info=abc&limit=250>; rel="next", <...?page_info=xyz>; rel="previous"`
pub fn parse_link_header(link_header: &str) -> PageInfo {
    let mut info = PageInfo::default();

    for part in link_header.split(',') {
        let part = part.trim();

        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel) {
            if let Some(cursor) = extract_page_info(url) {
                match rel_type {
                    "next" => info.next = Some(cursor),
                    "previous" => info.previous = Some(cursor),
                    _ => {}
                }
            }
        }
    }

    info
}

/// Extract the `page_info` query parameter from a URL.
fn extract_page_info(url: &str) -> Option<String> {
    let query_start = url.find('?')?;
    let query = &url[query_start + 1..];

    for param in query.split('&') {
        if let Some(value) = param.strip_prefix("page_info=") {
            if !value.is_empty() {
                return Some(value.to_owned());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link_header_next_and_previous() {
        let header = r#"<https://demo.myshopify.com/admin/api/2023-10/products.json?page_info=abc123&limit=250>; rel="next", <https://demo.myshopify.com/admin/api/2023-10/products.json?page_info=xyz789&limit=250>; rel="previous""#;

        let info = parse_link_header(header);
        assert_eq!(info.next.as_deref(), Some("abc123"));
        assert_eq!(info.previous.as_deref(), Some("xyz789"));
    }

    #[test]
    fn test_parse_link_header_only_next() {
        let header = r#"<https://demo.myshopify.com/admin/api/2023-10/locations.json?limit=250&page_info=cursor1>; rel="next""#;

        let info = parse_link_header(header);
        assert_eq!(info.next.as_deref(), Some("cursor1"));
        assert_eq!(info.previous, None);
    }

    #[test]
    fn test_parse_link_header_empty() {
        assert_eq!(parse_link_header(""), PageInfo::default());
    }

    #[test]
    fn test_parse_link_header_unknown_rel_is_ignored() {
        let header = r#"<https://demo.myshopify.com/x?page_info=abc>; rel="first""#;
        assert_eq!(parse_link_header(header), PageInfo::default());
    }

    #[test]
    fn test_extract_page_info() {
        assert_eq!(
            extract_page_info("https://x/y?page_info=abc&limit=250"),
            Some("abc".to_owned())
        );
        assert_eq!(
            extract_page_info("https://x/y?limit=250&page_info=abc"),
            Some("abc".to_owned())
        );
        assert_eq!(extract_page_info("https://x/y?limit=250"), None);
        assert_eq!(extract_page_info("https://x/y"), None);
        assert_eq!(extract_page_info("https://x/y?page_info="), None);
    }
}
