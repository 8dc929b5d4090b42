use debileweb_common::errors::*;

/// Page size of every paginated listing, as on the old group pages.
pub const PER_PAGE: i64 = 15;

/// Maximum number of rows returned by the autocomplete endpoints.
pub const SEARCH_LIMIT: i64 = 10;

/// Selects which sources a listing endpoint returns. Every variant maps to
/// one deterministic predicate and one deterministic order; the models
/// translate both into the actual query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    /// All sources, most recently uploaded first.
    Recent,
    /// Sources with at least one job that hasn't finished.
    Unfinished,
    /// Sources with at least one job waiting for a builder.
    Queued,
    /// Sources without any recorded binaries.
    Unbuilt,
    /// Sources with at least one failed job.
    Failed,
    /// Sources of one group, oldest upload first (the group page order).
    Group(String),
    /// Sources whose name starts with the given prefix.
    Prefix(String),
    /// Sources whose uploader matches the given substring.
    Maintainer(String),
    /// Sources whose name starts with the given search term.
    NameSearch(String),
}

impl ListFilter {
    /// Maps a filter key to its variant. Unknown keys fall back to a prefix
    /// match on the source name; that fallback is the documented default for
    /// the `/prefix/` style listings, not an error.
    pub fn parse(key: &str) -> ListFilter {
        match key {
            "recent" => ListFilter::Recent,
            "unfinished" | "incomplete" => ListFilter::Unfinished,
            "queued" => ListFilter::Queued,
            "unbuilt" => ListFilter::Unbuilt,
            "failed" => ListFilter::Failed,
            other => ListFilter::Prefix(other.to_string()),
        }
    }

    pub fn order(&self) -> SourceOrder {
        match self {
            ListFilter::Recent
            | ListFilter::Unfinished
            | ListFilter::Queued
            | ListFilter::Unbuilt
            | ListFilter::Failed => SourceOrder::UploadedDesc,
            ListFilter::Group(_) => SourceOrder::UploadedAsc,
            ListFilter::Prefix(_) | ListFilter::Maintainer(_) | ListFilter::NameSearch(_) => {
                SourceOrder::NameAsc
            }
        }
    }
}

/// Sort order of a source listing. Each order carries the source id as a
/// stable tiebreak so rows with equal primary keys paginate reproducibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrder {
    UploadedDesc,
    UploadedAsc,
    NameAsc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Result<Pagination> {
        if page < 0 {
            bail!("Page number cannot be negative: {}", page);
        }
        if per_page <= 0 {
            bail!("Page size must be positive: {}", per_page);
        }
        Ok(Pagination { page, per_page })
    }

    pub fn offset(&self) -> i64 {
        self.page * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self, total: i64) -> bool {
        total > (self.page + 1) * self.per_page
    }
}

/// Prefix match on a source name. The "l" prefix excludes the lib*
/// namespace, which has its own prefixes (liba, libb, ...).
pub fn prefix_matches(prefix: &str, name: &str) -> bool {
    if prefix == "l" && name.starts_with("lib") {
        return false;
    }
    name.starts_with(prefix)
}

/// The prefix index: a..z plus liba..libz. This could be computed from the
/// database, but a farm rebuilding Debian will have all of them anyway.
pub fn default_prefixes() -> Vec<String> {
    let mut prefixes: Vec<String> = ('a'..='z').map(|c| c.to_string()).collect();
    prefixes.extend(('a'..='z').map(|c| format!("lib{}", c)));
    prefixes
}
