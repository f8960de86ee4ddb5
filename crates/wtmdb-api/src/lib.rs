//! API client library for wtmdb.
//!
//! Provides the client for the TMDB movie catalog API.

/// TMDB API client.
pub mod tmdb;
