//! Paging, search and ordering for the events listing

pub const PAGE_SIZES: [u32; 4] = [6, 12, 24, 48];
pub const DEFAULT_PAGE_SIZE: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    NewestFirst,
    OldestFirst,
    TitleAsc,
    TitleDesc,
}

impl OrderBy {
    pub const ALL: [OrderBy; 4] = [
        OrderBy::NewestFirst,
        OrderBy::OldestFirst,
        OrderBy::TitleAsc,
        OrderBy::TitleDesc,
    ];

    pub fn as_odata(&self) -> &'static str {
        match self {
            OrderBy::NewestFirst => "startDate desc",
            OrderBy::OldestFirst => "startDate asc",
            OrderBy::TitleAsc => "title asc",
            OrderBy::TitleDesc => "title desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderBy::NewestFirst => "Newest First",
            OrderBy::OldestFirst => "Oldest First",
            OrderBy::TitleAsc => "Title A-Z",
            OrderBy::TitleDesc => "Title Z-A",
        }
    }

    pub fn parse(input: &str) -> Option<OrderBy> {
        match input.trim().to_lowercase().as_str() {
            "newest" | "new" | "desc" => Some(OrderBy::NewestFirst),
            "oldest" | "old" | "asc" => Some(OrderBy::OldestFirst),
            "az" | "a-z" | "title" => Some(OrderBy::TitleAsc),
            "za" | "z-a" => Some(OrderBy::TitleDesc),
            _ => None,
        }
    }

    pub fn next(&self) -> OrderBy {
        let idx = OrderBy::ALL.iter().position(|o| o == self).unwrap_or(0);
        OrderBy::ALL[(idx + 1) % OrderBy::ALL.len()]
    }
}

/// Everything that shapes one listing request. Responses are tagged with the
/// query that produced them so stale ones can be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub order_by: OrderBy,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl EventQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            order_by: OrderBy::default(),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn filter_expression(&self) -> Option<String> {
        let term = self.search.trim();
        if term.is_empty() {
            return None;
        }
        let term = term.to_lowercase().replace('\'', "''");
        Some(format!(
            "contains(tolower(title), '{term}') or contains(tolower(description), '{term}')"
        ))
    }

    /// OData query pairs; zero skip and empty filter are left out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("$top", self.page_size.to_string())];
        let skip = self.offset();
        if skip > 0 {
            params.push(("$skip", skip.to_string()));
        }
        if let Some(filter) = self.filter_expression() {
            params.push(("$filter", filter));
        }
        params.push(("$orderby", self.order_by.as_odata().to_string()));
        params
    }

    pub fn total_pages(&self, total_count: u64) -> u32 {
        let size = u64::from(self.page_size.max(1));
        total_count.div_ceil(size).min(u64::from(u32::MAX)) as u32
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_order(&mut self, order_by: OrderBy) {
        self.order_by = order_by;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.order_by = OrderBy::default();
        self.page = 1;
    }

    pub fn active_filter_count(&self) -> usize {
        usize::from(!self.search.trim().is_empty())
            + usize::from(self.order_by != OrderBy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_page_of_six() {
        let mut query = EventQuery::with_page_size(6);
        query.page = 2;
        let params = query.to_params();
        assert!(params.contains(&("$skip", "6".to_string())));
        assert!(params.contains(&("$top", "6".to_string())));
        assert!(params.contains(&("$orderby", "startDate desc".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "$filter"));
    }

    #[test]
    fn test_first_page_omits_skip() {
        let query = EventQuery::default();
        assert!(!query.to_params().iter().any(|(k, _)| *k == "$skip"));
    }

    #[test]
    fn test_filter_expression_escapes_quotes() {
        let mut query = EventQuery::default();
        query.set_search("O'Brien Party");
        assert_eq!(
            query.filter_expression().unwrap(),
            "contains(tolower(title), 'o''brien party') or contains(tolower(description), 'o''brien party')"
        );
    }

    #[test]
    fn test_changes_reset_page() {
        let mut query = EventQuery::default();
        query.page = 3;
        query.set_order(OrderBy::TitleAsc);
        assert_eq!(query.page, 1);
        query.page = 4;
        query.set_page_size(24);
        assert_eq!(query.page, 1);
        query.page = 2;
        query.clear_filters();
        assert_eq!(query.page, 1);
        assert_eq!(query.order_by, OrderBy::NewestFirst);
    }

    #[test]
    fn test_total_pages_and_filter_count() {
        let mut query = EventQuery::with_page_size(6);
        assert_eq!(query.total_pages(0), 0);
        assert_eq!(query.total_pages(11), 2);
        assert_eq!(query.total_pages(12), 2);
        assert_eq!(query.total_pages(13), 3);

        assert_eq!(query.active_filter_count(), 0);
        query.set_search("x");
        query.set_order(OrderBy::OldestFirst);
        assert_eq!(query.active_filter_count(), 2);
    }

    #[test]
    fn test_order_parse_and_cycle() {
        assert_eq!(OrderBy::parse("za"), Some(OrderBy::TitleDesc));
        assert_eq!(OrderBy::parse("sideways"), None);
        assert_eq!(OrderBy::TitleDesc.next(), OrderBy::NewestFirst);
    }
}
