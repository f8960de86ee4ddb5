//! Accumulated search results.

use std::collections::HashSet;

use wtmdb_api::tmdb::TmdbMovieSummary;

/// Appends the movies of `next` whose ids are not yet in `acc`.
///
/// Existing entries keep their order; new entries follow in `next` order.
/// Duplicates within `next` are dropped as well. Returns the number of
/// movies added.
pub fn merge_unique(acc: &mut Vec<TmdbMovieSummary>, next: Vec<TmdbMovieSummary>) -> usize {
    let mut seen: HashSet<u64> = acc.iter().map(|m| m.id).collect();
    let before = acc.len();
    acc.extend(next.into_iter().filter(|m| seen.insert(m.id)));
    acc.len().saturating_sub(before)
}

/// Ordered, id-unique list of fetched movie summaries for the current query.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    movies: Vec<TmdbMovieSummary>,
}

impl ResultSet {
    /// Accumulated movies in fetch order.
    #[must_use]
    pub fn movies(&self) -> &[TmdbMovieSummary] {
        &self.movies
    }

    /// Number of accumulated movies.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether nothing has been accumulated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Movie at `index` in fetch order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TmdbMovieSummary> {
        self.movies.get(index)
    }

    /// Replaces everything with a fresh first page.
    pub fn replace(&mut self, page: Vec<TmdbMovieSummary>) {
        self.movies.clear();
        merge_unique(&mut self.movies, page);
    }

    /// Extends with a follow-up page, skipping ids already present.
    pub fn append(&mut self, page: Vec<TmdbMovieSummary>) -> usize {
        merge_unique(&mut self.movies, page)
    }
}
