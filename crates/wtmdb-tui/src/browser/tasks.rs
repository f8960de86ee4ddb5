//! Background fetch tasks.
//!
//! Each request kind owns one slot. Spawning into an occupied slot aborts
//! the task already there, so at most one catalog and one detail fetch run
//! at a time.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use wtmdb_api::tmdb::{TmdbApi, TmdbMovieListResponse};

use super::state::FetchMessage;
use crate::query::CatalogRequest;
use crate::request::RequestId;

/// Sends `request` to the matching catalog endpoint.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn fetch_catalog<A: TmdbApi + Sync>(
    api: &A,
    request: &CatalogRequest,
) -> Result<TmdbMovieListResponse> {
    match request {
        CatalogRequest::Search(params) => api.search_movie(params).await,
        CatalogRequest::Popular(params) => api.popular_movies(params).await,
    }
}

/// Running fetch tasks, reporting back over an mpsc channel.
#[derive(Debug)]
pub struct TaskSlots<C> {
    client: Arc<C>,
    tx: UnboundedSender<FetchMessage>,
    catalog: Option<JoinHandle<()>>,
    details: Option<JoinHandle<()>>,
}

impl<C> TaskSlots<C>
where
    C: TmdbApi + Send + Sync + 'static,
{
    /// Creates empty slots sharing `client`.
    pub const fn new(client: Arc<C>, tx: UnboundedSender<FetchMessage>) -> Self {
        Self {
            client,
            tx,
            catalog: None,
            details: None,
        }
    }

    /// Starts a catalog fetch, aborting the previous one.
    pub fn spawn_catalog(&mut self, id: RequestId, request: CatalogRequest) {
        abort(self.catalog.take());
        tracing::debug!(%id, %request, "fetching catalog");

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.catalog = Some(tokio::spawn(async move {
            let result = fetch_catalog(client.as_ref(), &request).await;
            // The receiver is gone once the browser has quit.
            let _ = tx.send(FetchMessage::Catalog {
                id,
                request,
                result,
            });
        }));
    }

    /// Starts a detail fetch, aborting the previous one.
    pub fn spawn_details(&mut self, id: RequestId, movie_id: u64) {
        abort(self.details.take());
        tracing::debug!(%id, movie_id, "fetching details");

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.details = Some(tokio::spawn(async move {
            let result = client.movie_details(movie_id).await;
            let _ = tx.send(FetchMessage::Details {
                id,
                movie_id,
                result,
            });
        }));
    }

    /// Aborts the running detail fetch, if any.
    pub fn cancel_details(&mut self) {
        abort(self.details.take());
    }

    /// Aborts everything still running.
    pub fn shutdown(&mut self) {
        abort(self.catalog.take());
        abort(self.details.take());
    }
}

fn abort(handle: Option<JoinHandle<()>>) {
    if let Some(handle) = handle
        && !handle.is_finished()
    {
        handle.abort();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::unreachable)]
    #![allow(clippy::arithmetic_side_effects)]

    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::bail;
    use tokio::sync::mpsc;
    use tokio::time::timeout;
    use wtmdb_api::tmdb::{
        PopularMoviesParams, SearchMovieParams, TmdbMovieDetails, TmdbMovieSummary,
    };

    use super::*;
    use crate::request::RequestTracker;

    const SLOW: Duration = Duration::from_millis(200);

    /// Canned responses. A search for "slow" and every detail lookup take a while.
    #[derive(Debug, Default)]
    struct MockTmdbApi {
        calls: Mutex<Vec<String>>,
    }

    impl MockTmdbApi {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn listing(id: u64) -> TmdbMovieListResponse {
            TmdbMovieListResponse {
                page: 1,
                results: vec![TmdbMovieSummary {
                    id,
                    title: format!("Movie {id}"),
                    poster_path: None,
                    vote_average: None,
                    release_date: None,
                }],
                total_pages: 1,
                total_results: 1,
            }
        }
    }

    impl TmdbApi for MockTmdbApi {
        async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbMovieListResponse> {
            self.record(format!("search:{}", params.query));
            if params.query == "slow" {
                tokio::time::sleep(SLOW).await;
            }
            Ok(Self::listing(1))
        }

        async fn popular_movies(
            &self,
            params: &PopularMoviesParams,
        ) -> Result<TmdbMovieListResponse> {
            self.record(format!("popular:{}", params.page));
            Ok(Self::listing(2))
        }

        async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails> {
            self.record(format!("details:{movie_id}"));
            tokio::time::sleep(SLOW).await;
            bail!("no details for {movie_id}")
        }
    }

    fn ids(count: usize) -> Vec<RequestId> {
        let mut tracker = RequestTracker::default();
        (0..count).map(|_| tracker.begin().0).collect()
    }

    #[tokio::test]
    async fn test_fetch_catalog_routes_by_request() {
        // Arrange
        let api = MockTmdbApi::default();

        // Act
        fetch_catalog(&api, &CatalogRequest::new("Matrix", 1))
            .await
            .unwrap();
        fetch_catalog(&api, &CatalogRequest::new("", 3)).await.unwrap();

        // Assert
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![String::from("search:Matrix"), String::from("popular:3")]
        );
    }

    #[tokio::test]
    async fn test_spawn_catalog_aborts_previous() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let api = Arc::new(MockTmdbApi::default());
        let mut slots = TaskSlots::new(Arc::clone(&api), tx);
        let request_ids = ids(2);

        // Act
        slots.spawn_catalog(request_ids[0], CatalogRequest::new("slow", 1));
        tokio::task::yield_now().await;
        slots.spawn_catalog(request_ids[1], CatalogRequest::new("", 1));
        let first = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        let second = timeout(SLOW + SLOW, rx.recv()).await;

        // Assert
        match first.unwrap() {
            FetchMessage::Catalog { id, result, .. } => {
                assert_eq!(id, request_ids[1]);
                assert_eq!(result.unwrap().results[0].id, 2);
            }
            other @ FetchMessage::Details { .. } => {
                unreachable!("unexpected message {other:?}")
            }
        }
        assert!(second.is_err(), "aborted fetch must not report back");
    }

    #[tokio::test]
    async fn test_cancel_details_suppresses_result() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut slots = TaskSlots::new(Arc::new(MockTmdbApi::default()), tx);
        let request_ids = ids(1);

        // Act
        slots.spawn_details(request_ids[0], 603);
        tokio::task::yield_now().await;
        slots.cancel_details();
        let received = timeout(SLOW + SLOW, rx.recv()).await;

        // Assert
        assert!(received.is_err());
    }

    #[tokio::test]
    async fn test_details_failure_is_reported() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut slots = TaskSlots::new(Arc::new(MockTmdbApi::default()), tx);
        let request_ids = ids(1);

        // Act
        slots.spawn_details(request_ids[0], 603);
        let received = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();

        // Assert
        match received.unwrap() {
            FetchMessage::Details {
                id,
                movie_id,
                result,
            } => {
                assert_eq!(id, request_ids[0]);
                assert_eq!(movie_id, 603);
                assert!(result.is_err());
            }
            other @ FetchMessage::Catalog { .. } => {
                unreachable!("unexpected message {other:?}")
            }
        }
    }
}
