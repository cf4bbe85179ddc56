use crate::config::PaginationConfig;
use serde::{Deserialize, Serialize};

/// Envelope for every paginated listing: `{ data, meta }`.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PageMeta {
    #[must_use]
    pub const fn new(total: i64, page: i64, limit: i64) -> Self {
        // `i64::div_ceil` is unstable (`int_roundings`); this is its documented equivalent.
        let total_pages = if limit > 0 {
            let (d, r) = (total / limit, total % limit);
            if (r > 0 && limit > 0) || (r < 0 && limit < 0) { d + 1 } else { d }
        } else {
            0
        };
        Self { total, page, limit, total_pages }
    }
}

impl<T> Paginated<T> {
    #[must_use]
    pub const fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self { data, meta: PageMeta::new(total, page, limit) }
    }
}

/// Page/limit query parameters, clamped against the configured bounds.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// Resolves to (page, limit, offset).
    #[must_use]
    pub fn resolve(self, config: &PaginationConfig) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(config.default_limit).clamp(1, config.max_limit);
        (page, limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination() -> PaginationConfig {
        PaginationConfig { default_limit: 20, max_limit: 100 }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PageMeta::new(25, 1, 10).total_pages, 3);
        assert_eq!(PageMeta::new(20, 1, 10).total_pages, 2);
        assert_eq!(PageMeta::new(0, 1, 10).total_pages, 0);
    }

    #[test]
    fn params_default_and_clamp() {
        let config = pagination();

        assert_eq!(PageParams::default().resolve(&config), (1, 20, 0));
        assert_eq!(PageParams { page: Some(3), limit: Some(10) }.resolve(&config), (3, 10, 20));
        assert_eq!(PageParams { page: Some(0), limit: Some(1_000) }.resolve(&config), (1, 100, 0));
    }
}
