//! Display formatting for movie cards and the detail dialog.

use chrono::NaiveDate;
use wtmdb_api::tmdb::{TMDB_IMAGE_BASE_URL, TmdbMovieDetails, TmdbMovieSummary, YOUTUBE_WATCH_URL};

/// Shown wherever a value is unknown.
pub const PLACEHOLDER: &str = "\u{2014}";

/// Shown when a movie has no overview.
pub const NO_OVERVIEW: &str = "No overview available.";

fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// `"136 min"`, or the placeholder for a missing or zero runtime.
#[must_use]
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{m} min"),
        _ => String::from(PLACEHOLDER),
    }
}

/// Medium date form, e.g. `"Mar 31, 1999"`.
#[must_use]
pub fn format_release_date(date: Option<&str>) -> String {
    parse_date(date).map_or_else(
        || String::from(PLACEHOLDER),
        |d| d.format("%b %-d, %Y").to_string(),
    )
}

/// Release year for cards.
#[must_use]
pub fn release_year(date: Option<&str>) -> Option<String> {
    parse_date(date).map(|d| d.format("%Y").to_string())
}

/// Genre names joined by `", "`.
#[must_use]
pub fn format_genres<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let joined = names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        return String::from(PLACEHOLDER);
    }
    joined
}

/// Detail dialog rating, e.g. `"8.2/10"`.
#[must_use]
pub fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| String::from(PLACEHOLDER), |r| format!("{r:.1}/10"))
}

/// Card rating; unlike the dialog the `/10` suffix is always shown.
#[must_use]
pub fn card_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| format!("{PLACEHOLDER}/10"), |r| format!("{r:.1}/10"))
}

/// Full-size poster URL for a TMDB poster path.
#[must_use]
pub fn poster_url(path: &str) -> String {
    format!("{TMDB_IMAGE_BASE_URL}{path}")
}

/// Watch URL for a YouTube video key.
#[must_use]
pub fn trailer_url(key: &str) -> String {
    format!("{YOUTUBE_WATCH_URL}{key}")
}

/// Poster source with a one-way fallback to the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    /// Remote image URL.
    Remote(String),
    /// No usable image.
    Placeholder,
}

impl Poster {
    /// Poster for an optional TMDB path.
    #[must_use]
    pub fn from_path(path: Option<&str>) -> Self {
        path.filter(|p| !p.trim().is_empty())
            .map_or(Self::Placeholder, |p| Self::Remote(poster_url(p)))
    }

    /// URL to open, if still remote.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Remote(url) => Some(url),
            Self::Placeholder => None,
        }
    }

    /// Records a load failure.
    ///
    /// Returns `true` only for the first failure; the placeholder never
    /// fails again.
    pub fn fail(&mut self) -> bool {
        if matches!(self, Self::Placeholder) {
            return false;
        }
        *self = Self::Placeholder;
        true
    }
}

/// Card text for one search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Movie id.
    pub id: u64,
    /// Title, or the placeholder when blank.
    pub title: String,
    /// Rating label.
    pub rating: String,
    /// Release year, when known.
    pub year: Option<String>,
    /// Whether the movie has a poster image.
    pub has_poster: bool,
}

impl CardView {
    /// Formats a list summary.
    #[must_use]
    pub fn from_summary(movie: &TmdbMovieSummary) -> Self {
        let title = if movie.title.trim().is_empty() {
            String::from(PLACEHOLDER)
        } else {
            movie.title.clone()
        };
        Self {
            id: movie.id,
            title,
            rating: card_rating(movie.vote_average),
            year: release_year(movie.release_date.as_deref()),
            has_poster: !matches!(
                Poster::from_path(movie.poster_path.as_deref()),
                Poster::Placeholder
            ),
        }
    }
}

/// Fully formatted detail dialog content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Title, or the placeholder when blank.
    pub title: String,
    /// Release date line.
    pub release_date: String,
    /// Runtime line.
    pub runtime: String,
    /// Genre line.
    pub genres: String,
    /// Rating line.
    pub rating: String,
    /// Overview paragraph.
    pub overview: String,
    /// YouTube trailer link, only for a YouTube video of type "Trailer".
    pub trailer_url: Option<String>,
}

impl DetailView {
    /// Formats fetched details.
    #[must_use]
    pub fn from_details(details: &TmdbMovieDetails) -> Self {
        let title = if details.title.trim().is_empty() {
            String::from(PLACEHOLDER)
        } else {
            details.title.clone()
        };
        Self {
            title,
            release_date: format_release_date(details.release_date.as_deref()),
            runtime: format_runtime(details.runtime),
            genres: format_genres(details.genres.iter().map(|g| g.name.as_str())),
            rating: format_rating(details.vote_average),
            overview: details
                .overview
                .clone()
                .unwrap_or_else(|| String::from(NO_OVERVIEW)),
            trailer_url: details.youtube_trailer_key().map(trailer_url),
        }
    }
}
