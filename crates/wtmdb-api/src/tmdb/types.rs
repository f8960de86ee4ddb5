//! TMDB API response types and request parameters.
//!
//! Response types are permissive: every field TMDB may omit or null out is
//! either optional or defaulted here, so callers never repeat fallback checks.

use serde::{Deserialize, Deserializer};

/// Site name TMDB uses for YouTube-hosted videos.
pub const VIDEO_SITE_YOUTUBE: &str = "YouTube";

/// Video type TMDB uses for trailers.
pub const VIDEO_TYPE_TRAILER: &str = "Trailer";

/// Deserializes `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes an empty or whitespace-only string as `None`.
///
/// TMDB reports unknown release dates as `""` rather than `null`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Defaults a missing page number to 1.
const fn first_page() -> u32 {
    1
}

// --- Movie lists (search/movie, movie/popular) ---

/// Response from `search/movie` and `movie/popular`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieListResponse {
    /// Current page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Movie summaries on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<TmdbMovieSummary>,
    /// Total number of pages.
    #[serde(default = "first_page")]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie as returned by the list endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Poster image path (e.g. `/abc.jpg`).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Release date (`YYYY-MM-DD`).
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<String>,
}

// --- Movie details ---

/// Response from `movie/{movie_id}?append_to_response=videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Release date (`YYYY-MM-DD`).
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Genres in TMDB order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<TmdbGenre>,
    /// Overview text.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub overview: Option<String>,
    /// Appended `videos` sub-resource.
    #[serde(default, deserialize_with = "null_as_default")]
    pub videos: TmdbVideoList,
}

impl TmdbMovieDetails {
    /// Returns the key of the first YouTube trailer, if any.
    #[must_use]
    pub fn youtube_trailer_key(&self) -> Option<&str> {
        self.videos
            .results
            .iter()
            .find(|v| v.site == VIDEO_SITE_YOUTUBE && v.kind == VIDEO_TYPE_TRAILER)
            .map(|v| v.key.as_str())
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    #[serde(default)]
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// The `videos` wrapper object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideoList {
    /// Video entries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<TmdbVideo>,
}

/// A single video attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbVideo {
    /// Hosting site (e.g. "YouTube", "Vimeo").
    #[serde(default)]
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser", "Clip").
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Site-specific video identifier.
    #[serde(default)]
    pub key: String,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Request Parameters ---

/// Parameters for `search/movie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content (default: false).
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Parameters for `movie/popular`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularMoviesParams {
    /// Result page (1-500, default: 1).
    pub page: u32,
}

impl PopularMoviesParams {
    /// Creates params for the given page.
    #[must_use]
    pub const fn new(page: u32) -> Self {
        Self { page }
    }
}

impl Default for PopularMoviesParams {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_summary_missing_fields_default() {
        // Arrange
        let json = r#"{"id": 42, "title": null, "release_date": ""}"#;

        // Act
        let movie: TmdbMovieSummary = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.id, 42);
        assert_eq!(movie.title, "");
        assert!(movie.poster_path.is_none());
        assert!(movie.vote_average.is_none());
        assert!(movie.release_date.is_none());
    }

    #[test]
    fn test_list_response_defaults() {
        // Arrange
        let json = r#"{"results": null}"#;

        // Act
        let response: TmdbMovieListResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert_eq!(response.total_pages, 1);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_youtube_trailer_key_requires_site_and_type() {
        // Arrange
        let json = r#"{
            "id": 1,
            "title": "Example",
            "videos": {"results": [
                {"site": "Vimeo", "type": "Trailer", "key": "vimeo1"},
                {"site": "YouTube", "type": "Teaser", "key": "teaser1"},
                {"site": "YouTube", "type": "Trailer", "key": "trailer1"},
                {"site": "YouTube", "type": "Trailer", "key": "trailer2"}
            ]}
        }"#;

        // Act
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.youtube_trailer_key(), Some("trailer1"));
    }

    #[test]
    fn test_details_without_videos() {
        // Arrange
        let json = r#"{"id": 7, "title": "No Videos", "genres": [], "runtime": null}"#;

        // Act
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert!(details.youtube_trailer_key().is_none());
        assert!(details.runtime.is_none());
        assert!(details.genres.is_empty());
        assert!(details.overview.is_none());
    }

    #[test]
    fn test_search_params_builder() {
        // Arrange & Act
        let params = SearchMovieParams::new("Matrix").page(3);

        // Assert
        assert_eq!(params.query, "Matrix");
        assert_eq!(params.page, 3);
        assert!(!params.include_adult);
    }
}
