//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints
//! and retrieves movie listings and movie details.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TMDB_IMAGE_BASE_URL, TmdbClient, TmdbClientBuilder, YOUTUBE_WATCH_URL};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    PopularMoviesParams, SearchMovieParams, TmdbGenre, TmdbMovieDetails, TmdbMovieListResponse,
    TmdbMovieSummary, TmdbVideo, TmdbVideoList, VIDEO_SITE_YOUTUBE, VIDEO_TYPE_TRAILER,
};
