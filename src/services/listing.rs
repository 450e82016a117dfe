//! Search, sort and pagination shared by every list view.
//!
//! Raw query-string values are resolved against a [`ListingSpec`] into a
//! [`ListingQuery`]. The repositories turn it into SQL: search filter, rating
//! filter and sort in the `WHERE`/`ORDER BY`, then a count picks the
//! [`PageWindow`] for `OFFSET`/`LIMIT`. Malformed optional inputs never fail;
//! they fall back to "no filter", the default sort or page 1.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const PAGE_SIZE: usize = 10;

/// Listing inputs exactly as they arrive in the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// Case-insensitive substring search
    pub search: Option<String>,
    /// Sort field, `-` prefix for descending
    pub sort: Option<String>,
    /// Alias of `sort`
    pub ordering: Option<String>,
    /// Inclusive lower bound on rating (feedback only)
    pub min_rating: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
}

/// What a component allows its listings to search and sort on.
#[derive(Debug, Clone, Copy)]
pub struct ListingSpec {
    pub search_fields: &'static [&'static str],
    pub sort_fields: &'static [&'static str],
    pub default_sort: &'static str,
    pub rating_filter: bool,
}

/// Job listing pages search the title only.
pub const JOB_PAGES: ListingSpec = ListingSpec {
    search_fields: &["job_title"],
    sort_fields: JOB_SORT_FIELDS,
    default_sort: "-salary_in_usd",
    rating_filter: false,
};

/// The REST collection also searches the residence country code.
pub const JOB_API: ListingSpec = ListingSpec {
    search_fields: &["job_title", "employee_residence"],
    sort_fields: JOB_SORT_FIELDS,
    default_sort: "-salary_in_usd",
    rating_filter: false,
};

const JOB_SORT_FIELDS: &[&str] = &[
    "salary_in_usd",
    "created_at",
    "work_year",
    "remote_ratio",
    "job_title",
];

pub const FEEDBACK: ListingSpec = ListingSpec {
    search_fields: &["comment"],
    sort_fields: &["created_at", "rating"],
    default_sort: "-created_at",
    rating_filter: true,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    /// Parse `field` or `-field`; `None` when the field is not sortable.
    pub fn parse(raw: &str, allowed: &[&str]) -> Option<Self> {
        let raw = raw.trim();
        let (field, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        allowed.contains(&field).then(|| SortKey {
            field: field.to_string(),
            descending,
        })
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            write!(f, "{}", self.field)
        }
    }
}

/// Resolved listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub sort: SortKey,
    pub min_rating: Option<i32>,
    /// `None` when the page was absent or not an integer.
    pub page: Option<i64>,
}

impl ListingQuery {
    pub fn resolve(params: &ListingParams, spec: &ListingSpec) -> Self {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let sort = params
            .sort
            .as_deref()
            .or(params.ordering.as_deref())
            .and_then(|raw| SortKey::parse(raw, spec.sort_fields))
            .or_else(|| SortKey::parse(spec.default_sort, spec.sort_fields))
            .unwrap_or_else(|| SortKey {
                field: spec.default_sort.trim_start_matches('-').to_string(),
                descending: spec.default_sort.starts_with('-'),
            });

        let min_rating = if spec.rating_filter {
            params.min_rating.as_deref().and_then(parse_min_rating)
        } else {
            None
        };

        let page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok());

        ListingQuery {
            search,
            sort,
            min_rating,
            page,
        }
    }

    /// Clamp the requested page: absent or non-numeric is page 1, below 1 or
    /// past the end is the last page. An empty listing still has one page.
    pub fn window(&self, total_count: usize) -> PageWindow {
        let total_pages = total_count.div_ceil(PAGE_SIZE).max(1);
        let current_page = match self.page {
            None => 1,
            Some(p) if p < 1 => total_pages,
            Some(p) => usize::try_from(p)
                .map(|p| p.min(total_pages))
                .unwrap_or(total_pages),
        };
        PageWindow {
            current_page,
            total_pages,
        }
    }
}

/// Digits only; anything else disables the filter.
pub fn parse_min_rating(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Page of a listing picked from the total row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: usize,
    pub total_pages: usize,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        ((self.current_page - 1) * PAGE_SIZE) as u64
    }

    pub fn limit(&self) -> u64 {
        PAGE_SIZE as u64
    }
}

/// `LIKE` pattern matching `needle` anywhere, lowercased, with `!` as the
/// escape character for the wildcards.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '!' | '%' | '_') {
            pattern.push('!');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// One page of a listing plus everything needed to render navigation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// Effective sort, e.g. `-salary_in_usd`
    pub sort: String,
    /// Effective search, empty when none
    pub search: String,
}

impl<T> ListingPage<T> {
    pub fn new(items: Vec<T>, total_count: usize, window: &PageWindow, query: &ListingQuery) -> Self {
        ListingPage {
            items,
            total_count,
            current_page: window.current_page,
            total_pages: window.total_pages,
            page_size: PAGE_SIZE,
            has_previous: window.current_page > 1,
            has_next: window.current_page < window.total_pages,
            sort: query.sort.to_string(),
            search: query.search.clone().unwrap_or_default(),
        }
    }
}
