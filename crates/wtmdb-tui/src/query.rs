//! Search query cleaning and catalog endpoint selection.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use wtmdb_api::tmdb::{PopularMoviesParams, SearchMovieParams};

/// Zero-width space, non-joiner, joiner, and byte order mark.
#[allow(clippy::expect_used)] // constant pattern, checked by tests
static INVISIBLE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{200B}-\u{200D}\u{FEFF}]").expect("valid regex"));

/// Strips zero-width characters, then trims surrounding whitespace.
#[must_use]
pub fn clean_query(raw: &str) -> String {
    INVISIBLE_CHARS.replace_all(raw, "").trim().to_owned()
}

/// A single catalog page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// `search/movie` for a non-empty cleaned query.
    Search(SearchMovieParams),
    /// `movie/popular` when the cleaned query is empty.
    Popular(PopularMoviesParams),
}

impl CatalogRequest {
    /// Builds the request for `raw` at `page`, routing on the cleaned query.
    #[must_use]
    pub fn new(raw: &str, page: u32) -> Self {
        let cleaned = clean_query(raw);
        if cleaned.is_empty() {
            Self::Popular(PopularMoviesParams::new(page))
        } else {
            Self::Search(SearchMovieParams::new(cleaned).page(page))
        }
    }

    /// Requested page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        match self {
            Self::Search(params) => params.page,
            Self::Popular(params) => params.page,
        }
    }

    /// Whether the response extends the accumulated results instead of replacing them.
    #[must_use]
    pub const fn appends(&self) -> bool {
        self.page() > 1
    }
}

impl fmt::Display for CatalogRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search(params) => write!(f, "search {:?} page {}", params.query, params.page),
            Self::Popular(params) => write!(f, "popular page {}", params.page),
        }
    }
}
