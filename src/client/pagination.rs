//! Paginated collections and the metadata GitLab attaches to them

use compact_str::CompactString;
use reqwest::header::{HeaderMap, LINK};

/// Pagination metadata from GitLab's `X-*` and `Link` response headers
///
/// GitLab omits `X-Total` and `X-Total-Pages` for large collections, and
/// `X-Next-Page`/`X-Prev-Page` are blank on the last/first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
    pub links: PageLinks,
}

/// Absolute page URLs from the `Link` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<CompactString>,
    pub prev: Option<CompactString>,
    pub first: Option<CompactString>,
    pub last: Option<CompactString>,
}

impl PageInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            page: numeric_header(headers, "x-page"),
            per_page: numeric_header(headers, "x-per-page"),
            total: numeric_header(headers, "x-total"),
            total_pages: numeric_header(headers, "x-total-pages"),
            next_page: numeric_header(headers, "x-next-page"),
            prev_page: numeric_header(headers, "x-prev-page"),
            links: headers
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .map(PageLinks::parse)
                .unwrap_or_default(),
        }
    }
}

impl PageLinks {
    /// Parse a `Link` header: `<url>; rel="next", <url>; rel="first"`
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();

        for entry in header.split(',') {
            let mut parts = entry.split(';').map(str::trim);
            let Some(url) = parts
                .next()
                .and_then(|u| u.strip_prefix('<'))
                .and_then(|u| u.strip_suffix('>'))
            else {
                continue;
            };

            let rel = parts
                .filter_map(|p| p.strip_prefix("rel="))
                .map(|r| r.trim_matches('"'))
                .next();

            let slot = match rel {
                Some("next") => &mut links.next,
                Some("prev") => &mut links.prev,
                Some("first") => &mut links.first,
                Some("last") => &mut links.last,
                _ => continue,
            };
            *slot = Some(url.into());
        }

        links
    }
}

fn numeric_header<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

/// One page of results, in the order the server returned them
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResponse<T> {
    items: Vec<T>,
    page_info: PageInfo,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn has_next_page(&self) -> bool {
        self.page_info.links.next.is_some()
    }

    pub fn has_prev_page(&self) -> bool {
        self.page_info.links.prev.is_some()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }

    /// Convert every item, failing on the first item that does not convert
    pub fn try_map<U, E>(
        self,
        f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<PaginatedResponse<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(PaginatedResponse { items, page_info: self.page_info })
    }
}

impl<T> IntoIterator for PaginatedResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PaginatedResponse<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn test_parse_link_header() {
        let links = PageLinks::parse(
            r#"<https://gitlab.example.com/api/v4/runners?page=2&per_page=2>; rel="next", <https://gitlab.example.com/api/v4/runners?page=1&per_page=2>; rel="first", <https://gitlab.example.com/api/v4/runners?page=3&per_page=2>; rel="last""#,
        );

        assert_eq!(
            links.next.as_deref(),
            Some("https://gitlab.example.com/api/v4/runners?page=2&per_page=2")
        );
        assert_eq!(
            links.first.as_deref(),
            Some("https://gitlab.example.com/api/v4/runners?page=1&per_page=2")
        );
        assert!(links.last.is_some());
        assert_eq!(links.prev, None);
    }

    #[test]
    fn test_parse_malformed_link_header() {
        assert_eq!(PageLinks::parse("garbage"), PageLinks::default());
        assert_eq!(PageLinks::parse(r#"<https://x>; rel="self""#), PageLinks::default());
    }

    #[test]
    fn test_page_info_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-page", HeaderValue::from_static("1"));
        headers.insert("x-per-page", HeaderValue::from_static("20"));
        headers.insert("x-total", HeaderValue::from_static("42"));
        headers.insert("x-total-pages", HeaderValue::from_static("3"));
        headers.insert("x-next-page", HeaderValue::from_static("2"));
        headers.insert("x-prev-page", HeaderValue::from_static(""));

        let info = PageInfo::from_headers(&headers);
        assert_eq!(info.page, Some(1));
        assert_eq!(info.per_page, Some(20));
        assert_eq!(info.total, Some(42));
        assert_eq!(info.total_pages, Some(3));
        assert_eq!(info.next_page, Some(2));
        assert_eq!(info.prev_page, None);
        assert_eq!(info.links, PageLinks::default());
    }

    #[test]
    fn test_map_keeps_order_and_metadata() {
        let info = PageInfo { page: Some(1), ..Default::default() };
        let response = PaginatedResponse::new(vec![3, 1, 2], info.clone());

        let doubled = response.map(|n| n * 2);
        assert_eq!(doubled.items(), &[6, 2, 4]);
        assert_eq!(doubled.page_info(), &info);
        assert_eq!(doubled.first(), Some(&6));
    }

    #[test]
    fn test_try_map_fails_on_first_error() {
        let response = PaginatedResponse::new(vec!["1", "x", "3"], PageInfo::default());
        let result = response.try_map(|s| s.parse::<u32>());
        assert!(result.is_err());
    }
}
