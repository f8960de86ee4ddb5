//! Client-side sort modes over the accumulated results.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::bail;
use chrono::NaiveDate;
use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::preferences::CollationNumericOrdering;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use wtmdb_api::tmdb::TmdbMovieSummary;

/// Root-locale collator at primary strength with numeric ordering.
#[allow(clippy::expect_used)] // root collation data is compiled in
static TITLE_COLLATOR: LazyLock<CollatorBorrowed<'static>> = LazyLock::new(|| {
    let mut prefs = CollatorPreferences::default();
    prefs.numeric_ordering = Some(CollationNumericOrdering::True);
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Primary);
    Collator::try_new(prefs, options).expect("failed to load root collation data")
});

/// Active sort mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Title A-Z (case/accent-insensitive, numeric-aware).
    #[default]
    Title,
    /// Rating, high to low.
    Rating,
    /// Release date, new to old.
    Date,
}

impl SortMode {
    /// All modes in selector order.
    pub const ALL: [Self; 3] = [Self::Title, Self::Rating, Self::Date];

    /// Identifier used on the command line and in config.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Rating => "rating",
            Self::Date => "date",
        }
    }

    /// Label shown in the sort selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title (A\u{2013}Z)",
            Self::Rating => "Rating (High \u{2192} Low)",
            Self::Date => "Release Date (New \u{2192} Old)",
        }
    }

    /// Next mode in selector order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Title => Self::Rating,
            Self::Rating => Self::Date,
            Self::Date => Self::Title,
        }
    }

    /// Previous mode in selector order, wrapping around.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Date,
            Self::Rating => Self::Title,
            Self::Date => Self::Rating,
        }
    }

    /// Compares two movies under this mode.
    #[must_use]
    pub fn compare(self, a: &TmdbMovieSummary, b: &TmdbMovieSummary) -> Ordering {
        match self {
            Self::Title => compare_titles(&a.title, &b.title),
            Self::Rating => rating_key(b).total_cmp(&rating_key(a)),
            Self::Date => release_key(b).cmp(&release_key(a)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "rating" => Ok(Self::Rating),
            "date" => Ok(Self::Date),
            other => bail!("unknown sort mode '{other}' (expected title, rating, or date)"),
        }
    }
}

/// Returns indices into `movies` in `mode` order.
///
/// The sort is stable, so ties keep their accumulated order. `movies` itself is
/// never reordered.
#[must_use]
pub fn sorted_indices(movies: &[TmdbMovieSummary], mode: SortMode) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..movies.len()).collect();
    indices.sort_by(|&a, &b| match (movies.get(a), movies.get(b)) {
        (Some(a), Some(b)) => mode.compare(a, b),
        _ => Ordering::Equal,
    });
    indices
}

/// Missing ratings count as 0.
fn rating_key(movie: &TmdbMovieSummary) -> f64 {
    movie.vote_average.unwrap_or(0.0)
}

/// Missing or unparseable dates count as the Unix epoch.
fn release_key(movie: &TmdbMovieSummary) -> NaiveDate {
    movie
        .release_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or_default()
}

/// Compares titles the way a base-sensitivity, numeric locale compare does.
///
/// Case and accents are ignored, digit runs compare by value ("Rocky 2"
/// before "Rocky 10"), and expansions such as "ß" = "ss" apply.
#[must_use]
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TITLE_COLLATOR.compare(a, b)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn movie(id: u64, title: &str, rating: Option<f64>, date: Option<&str>) -> TmdbMovieSummary {
        TmdbMovieSummary {
            id,
            title: String::from(title),
            poster_path: None,
            vote_average: rating,
            release_date: date.map(String::from),
        }
    }

    fn ordered_ids(movies: &[TmdbMovieSummary], mode: SortMode) -> Vec<u64> {
        sorted_indices(movies, mode)
            .into_iter()
            .map(|i| movies[i].id)
            .collect()
    }

    #[test]
    fn test_rating_descending_missing_last() {
        // Arrange
        let movies = vec![
            movie(1, "A", Some(7.2), None),
            movie(2, "B", None, None),
            movie(3, "C", Some(9.0), None),
        ];

        // Act
        let ids = ordered_ids(&movies, SortMode::Rating);

        // Assert
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_rating_ties_keep_accumulated_order() {
        // Arrange
        let movies = vec![
            movie(1, "A", None, None),
            movie(2, "B", Some(0.0), None),
            movie(3, "C", Some(5.0), None),
            movie(4, "D", Some(5.0), None),
        ];

        // Act
        let ids = ordered_ids(&movies, SortMode::Rating);

        // Assert
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_date_descending_missing_and_invalid_last() {
        // Arrange
        let movies = vec![
            movie(1, "Old", None, Some("1984-10-26")),
            movie(2, "Unknown", None, None),
            movie(3, "New", None, Some("2021-10-22")),
            movie(4, "Garbage", None, Some("soon")),
        ];

        // Act
        let ids = ordered_ids(&movies, SortMode::Date);

        // Assert
        assert_eq!(ids, vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_title_case_and_accent_insensitive() {
        // Arrange & Act & Assert
        assert_eq!(compare_titles("Amélie", "amelie"), Ordering::Equal);
        assert_eq!(compare_titles("alien", "Blade Runner"), Ordering::Less);
        assert_eq!(compare_titles("Élan", "Dune"), Ordering::Greater);
    }

    #[test]
    fn test_title_expansions_and_punctuation() {
        // Arrange & Act & Assert
        assert_eq!(compare_titles("Straße", "Strasse"), Ordering::Equal);
        assert_eq!(compare_titles("Straße", "Strat"), Ordering::Less);
        assert_eq!(compare_titles("Æon Flux", "Avatar"), Ordering::Less);
        assert_eq!(compare_titles("_Hidden", "1917"), Ordering::Less);
        assert_eq!(compare_titles("1917", "Alien"), Ordering::Less);
    }

    #[test]
    fn test_title_numeric_aware() {
        // Arrange
        let movies = vec![
            movie(1, "Rocky 10", None, None),
            movie(2, "Rocky 2", None, None),
            movie(3, "Rocky", None, None),
            movie(4, "Rocky 02", None, None),
        ];

        // Act
        let ids = ordered_ids(&movies, SortMode::Title);

        // Assert: "2" and "02" compare equal and keep their order
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_title_empty_sorts_first() {
        // Arrange
        let movies = vec![movie(1, "Zodiac", None, None), movie(2, "", None, None)];

        // Act
        let ids = ordered_ids(&movies, SortMode::Title);

        // Assert
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_sorting_is_idempotent() {
        // Arrange
        let movies = vec![
            movie(1, "Heat", Some(7.9), Some("1995-12-15")),
            movie(2, "alien", None, Some("1979-05-25")),
            movie(3, "Heat", Some(7.9), None),
            movie(4, "Se7en", Some(8.4), Some("")),
            movie(5, "12 Monkeys", Some(7.6), Some("1995-12-29")),
        ];

        for mode in SortMode::ALL {
            // Act
            let once: Vec<TmdbMovieSummary> = sorted_indices(&movies, mode)
                .into_iter()
                .map(|i| movies[i].clone())
                .collect();
            let twice = sorted_indices(&once, mode);

            // Assert
            assert_eq!(twice, (0..once.len()).collect::<Vec<_>>(), "mode {mode}");
        }
    }

    #[test]
    fn test_sorting_does_not_touch_input() {
        // Arrange
        let movies = vec![movie(2, "B", None, None), movie(1, "A", None, None)];

        // Act
        let _ = sorted_indices(&movies, SortMode::Title);

        // Assert
        assert_eq!(movies[0].id, 2);
        assert_eq!(movies[1].id, 1);
    }

    #[test]
    fn test_parse_and_cycle() {
        // Arrange & Act & Assert
        assert_eq!("Rating".parse::<SortMode>().unwrap(), SortMode::Rating);
        assert!("popularity".parse::<SortMode>().is_err());
        assert_eq!(SortMode::Date.next(), SortMode::Title);
        assert_eq!(SortMode::Title.prev(), SortMode::Date);
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
            assert_eq!(mode.next().prev(), mode);
        }
    }
}
