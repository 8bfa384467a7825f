/// Canonical host suffix for Shopify shop domains.
pub const SHOPIFY_DOMAIN_SUFFIX: &str = ".myshopify.com";

/// Normalize an externally supplied shop domain.
///
/// Trims whitespace, strips any scheme and trailing slashes, and appends
/// `.myshopify.com` when missing, so `https://demo.myshopify.com/`, `demo`,
/// and `demo.myshopify.com` all resolve to the same shop.
pub fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    if domain.is_empty() {
        return String::new();
    }

    let domain = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain);
    let domain = domain.trim_end_matches('/');

    if domain.ends_with(SHOPIFY_DOMAIN_SUFFIX) {
        domain.to_owned()
    } else {
        format!("{domain}{SHOPIFY_DOMAIN_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_gets_canonical_suffix() {
        assert_eq!(normalize_domain("demo"), "demo.myshopify.com");
    }

    #[test]
    fn full_domain_passes_through() {
        assert_eq!(normalize_domain("demo.myshopify.com"), "demo.myshopify.com");
    }

    #[test]
    fn scheme_and_trailing_slash_are_stripped() {
        assert_eq!(
            normalize_domain("https://demo.myshopify.com/"),
            "demo.myshopify.com"
        );
        assert_eq!(
            normalize_domain("http://demo.myshopify.com"),
            "demo.myshopify.com"
        );
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(normalize_domain("  demo  "), "demo.myshopify.com");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize_domain(""), "");
        assert_eq!(normalize_domain("   "), "");
    }
}
