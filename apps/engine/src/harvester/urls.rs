use crate::normalize::normalize;

/// Lowercase, accent-free, hyphen-separated path segment.
pub fn slugify(text: &str) -> String {
    normalize(text).replace(' ', "-")
}

/// Search-listing URL for a keyword and optional location, e.g.
/// `https://www.occ.com.mx/empleos/de-python/en-ciudad-de-mexico/?page=2`.
pub fn search_url(base_url: &str, keyword: &str, location: Option<&str>, page: usize) -> String {
    let mut url = format!("{}/empleos/de-{}/", base_url.trim_end_matches('/'), slugify(keyword));
    if let Some(location) = location.map(slugify).filter(|l| !l.is_empty()) {
        url.push_str(&format!("en-{location}/"));
    }
    if page > 1 {
        url.push_str(&format!("?page={page}"));
    }
    url
}

/// Resolves a possibly relative `href` against the source host.
pub fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}

/// `true` when `url` points at the configured source host.
pub fn is_source_url(base_url: &str, url: &str) -> bool {
    let base = base_url.trim_end_matches('/');
    url.strip_prefix(base)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.occ.com.mx";

    #[test]
    fn test_search_url_keyword_only() {
        assert_eq!(
            search_url(BASE, "Python Developer", None, 1),
            "https://www.occ.com.mx/empleos/de-python-developer/"
        );
    }

    #[test]
    fn test_search_url_with_location_and_page() {
        assert_eq!(
            search_url(BASE, "Analista de Datos", Some("Ciudad de México"), 3),
            "https://www.occ.com.mx/empleos/de-analista-de-datos/en-ciudad-de-mexico/?page=3"
        );
        assert_eq!(
            search_url("https://www.occ.com.mx/", "c++", Some("  "), 1),
            "https://www.occ.com.mx/empleos/de-cpp/"
        );
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(absolutize(BASE, "/empleo/oferta/123/"), "https://www.occ.com.mx/empleo/oferta/123/");
        assert_eq!(absolutize(BASE, "https://other.mx/x"), "https://other.mx/x");
    }

    #[test]
    fn test_is_source_url() {
        assert!(is_source_url(BASE, "https://www.occ.com.mx/empleo/oferta/1/"));
        assert!(!is_source_url(BASE, "https://www.occ.com.mx.evil.com/"));
        assert!(!is_source_url(BASE, "http://169.254.169.254/latest"));
    }
}
