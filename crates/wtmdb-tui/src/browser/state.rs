//! Movie browser state management.
//!
//! [`BrowserState`] performs no I/O. Every transition returns the
//! [`Command`]s the runner has to execute, and fetch results come back in
//! through [`BrowserState::apply`].

use std::time::{Duration, Instant};

use anyhow::Result;
use wtmdb_api::tmdb::{TmdbMovieDetails, TmdbMovieListResponse, TmdbMovieSummary};

use crate::debounce::Debouncer;
use crate::detail::{DetailView, Poster};
use crate::focus::{self, FocusTrap};
use crate::query::CatalogRequest;
use crate::request::{FetchPhase, RequestId, RequestTracker};
use crate::results::ResultSet;
use crate::sort::{SortMode, sorted_indices};

/// Shown above the grid when a catalog fetch fails.
pub const FETCH_MOVIES_ERROR: &str = "Failed to fetch movies.";

/// Shown in the dialog when a detail fetch fails.
pub const LOAD_DETAILS_ERROR: &str = "Failed to load details.";

/// Focusable controls of the main screen, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Search text input.
    SearchInput,
    /// "Search" button.
    SearchButton,
    /// "Clear" button.
    ClearButton,
    /// Sort mode selector.
    SortSelect,
    /// Movie card grid.
    Results,
    /// Load-more button.
    LoadMore,
}

/// Focusable controls of the detail dialog, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogControl {
    /// Close button.
    Close,
    /// Poster image link.
    Poster,
    /// YouTube trailer link.
    Trailer,
}

/// Kind of external link opened from the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Poster image.
    Poster,
    /// Trailer video.
    Trailer,
}

/// Card cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// One card left.
    Left,
    /// One card right.
    Right,
    /// One row up.
    Up,
    /// One row down.
    Down,
}

/// Side effect requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch a catalog page, superseding any catalog fetch in flight.
    FetchCatalog {
        /// Live request id.
        id: RequestId,
        /// Page to fetch.
        request: CatalogRequest,
    },
    /// Fetch one movie's details, superseding any detail fetch in flight.
    FetchDetails {
        /// Live request id.
        id: RequestId,
        /// TMDB movie id.
        movie_id: u64,
    },
    /// Abort the detail fetch in flight.
    CancelDetails,
    /// Open a URL with the system opener.
    OpenLink {
        /// What the URL points at.
        kind: LinkKind,
        /// Target URL.
        url: String,
    },
    /// Leave the browser.
    Quit,
}

/// Completed fetch, delivered back to the state.
#[derive(Debug)]
pub enum FetchMessage {
    /// Result of a [`Command::FetchCatalog`].
    Catalog {
        /// Request id it was issued under.
        id: RequestId,
        /// The request that was sent.
        request: CatalogRequest,
        /// Response or failure.
        result: Result<TmdbMovieListResponse>,
    },
    /// Result of a [`Command::FetchDetails`].
    Details {
        /// Request id it was issued under.
        id: RequestId,
        /// Requested movie.
        movie_id: u64,
        /// Response or failure.
        result: Result<TmdbMovieDetails>,
    },
}

/// What the open dialog currently shows. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogBody<'a> {
    /// Waiting for details.
    Loading,
    /// Detail fetch failed.
    Failed(&'a str),
    /// Details are available.
    Loaded(&'a DetailView),
}

/// State for the movie browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    search_text: String,
    debouncer: Debouncer<String>,
    sort: SortMode,
    page: u32,
    total_pages: u32,
    results: ResultSet,
    /// Indices into `results` in `sort` order.
    sorted: Vec<usize>,
    catalog: RequestTracker,
    catalog_phase: FetchPhase,
    error: Option<&'static str>,
    /// Last catalog request issued.
    fetched: Option<CatalogRequest>,
    selected_id: Option<u64>,
    details: Option<DetailView>,
    poster: Poster,
    detail: RequestTracker,
    detail_phase: FetchPhase,
    details_error: Option<&'static str>,
    focus: Focus,
    dialog: Option<FocusTrap<Focus, DialogControl>>,
    cursor: usize,
    columns: usize,
}

impl BrowserState {
    /// Creates the state with `initial_query` already settled.
    #[must_use]
    pub fn new(initial_query: &str, sort: SortMode, debounce: Duration) -> Self {
        Self {
            search_text: String::from(initial_query),
            debouncer: Debouncer::new(initial_query.trim().to_owned(), debounce),
            sort,
            page: 1,
            total_pages: 1,
            results: ResultSet::default(),
            sorted: Vec::new(),
            catalog: RequestTracker::default(),
            catalog_phase: FetchPhase::Idle,
            error: None,
            fetched: None,
            selected_id: None,
            details: None,
            poster: Poster::Placeholder,
            detail: RequestTracker::default(),
            detail_phase: FetchPhase::Idle,
            details_error: None,
            focus: Focus::SearchInput,
            dialog: None,
            cursor: 0,
            columns: 1,
        }
    }

    /// Issues the first catalog fetch.
    pub fn start(&mut self) -> Vec<Command> {
        self.refresh(false)
    }

    // --- Accessors ---

    /// Text in the search input.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Query the results belong to.
    #[must_use]
    pub fn query(&self) -> &str {
        self.debouncer.settled()
    }

    /// Active sort mode.
    #[must_use]
    pub const fn sort(&self) -> SortMode {
        self.sort
    }

    /// Current page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages reported by the last applied response.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Catalog error message, if the last fetch failed.
    #[must_use]
    pub const fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Whether a catalog fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.catalog.is_in_flight()
    }

    /// Catalog fetch lifecycle.
    #[must_use]
    pub const fn catalog_phase(&self) -> FetchPhase {
        self.catalog_phase
    }

    /// Detail fetch lifecycle.
    #[must_use]
    pub const fn detail_phase(&self) -> FetchPhase {
        self.detail_phase
    }

    /// Number of accumulated movies.
    #[must_use]
    pub const fn movie_count(&self) -> usize {
        self.results.len()
    }

    /// Accumulated movies in display order.
    pub fn visible_movies(&self) -> impl Iterator<Item = &TmdbMovieSummary> {
        self.sorted.iter().filter_map(|&i| self.results.get(i))
    }

    /// Card cursor position in display order.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Grid column count.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Movie under the card cursor.
    #[must_use]
    pub fn current_movie(&self) -> Option<&TmdbMovieSummary> {
        self.sorted
            .get(self.cursor)
            .and_then(|&i| self.results.get(i))
    }

    /// Focused main-screen control. Unchanged while the dialog is open.
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Movie shown in the dialog.
    #[must_use]
    pub const fn selected_id(&self) -> Option<u64> {
        self.selected_id
    }

    /// Whether the detail dialog is visible.
    #[must_use]
    pub const fn is_dialog_open(&self) -> bool {
        self.selected_id.is_some()
    }

    /// Focused dialog control.
    #[must_use]
    pub fn dialog_focus(&self) -> Option<DialogControl> {
        self.dialog.as_ref().and_then(FocusTrap::current)
    }

    /// Dialog content, if the dialog is open.
    #[must_use]
    pub fn dialog_body(&self) -> Option<DialogBody<'_>> {
        if self.selected_id.is_none() {
            return None;
        }
        if let Some(ref details) = self.details {
            return Some(DialogBody::Loaded(details));
        }
        if let Some(message) = self.details_error {
            return Some(DialogBody::Failed(message));
        }
        Some(DialogBody::Loading)
    }

    /// Poster shown in the dialog.
    #[must_use]
    pub const fn poster(&self) -> &Poster {
        &self.poster
    }

    // --- Search bar ---

    /// Appends a character to the search input.
    pub fn input_char(&mut self, c: char, now: Instant) {
        self.search_text.push(c);
        self.debouncer.push(self.search_text.trim().to_owned(), now);
    }

    /// Removes the last character from the search input.
    pub fn input_backspace(&mut self, now: Instant) {
        if self.search_text.pop().is_some() {
            self.debouncer.push(self.search_text.trim().to_owned(), now);
        }
    }

    /// Searches for the input text right away and returns to page 1.
    ///
    /// Retries an unchanged query when the previous fetch failed.
    pub fn submit(&mut self, now: Instant) -> Vec<Command> {
        self.debouncer.push(self.search_text.trim().to_owned(), now);
        self.debouncer.flush();
        self.page = 1;
        self.refresh(self.catalog_phase == FetchPhase::Failed)
    }

    /// Empties the search input and goes back to the popular listing.
    pub fn clear(&mut self, now: Instant) -> Vec<Command> {
        self.search_text.clear();
        self.debouncer.push(String::new(), now);
        self.debouncer.flush();
        self.page = 1;
        self.refresh(false)
    }

    /// When the pending query settles, if one is waiting.
    #[must_use]
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Settles a debounced query whose quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<Command> {
        if self.debouncer.poll(now).is_none() {
            return Vec::new();
        }
        self.page = 1;
        self.refresh(false)
    }

    /// Sets the sort mode. Sorting never triggers a fetch.
    pub fn set_sort(&mut self, mode: SortMode) {
        if self.sort != mode {
            self.sort = mode;
            self.resort();
        }
    }

    /// Cycles the sort selector.
    pub fn cycle_sort(&mut self, backwards: bool) {
        let mode = if backwards {
            self.sort.prev()
        } else {
            self.sort.next()
        };
        self.set_sort(mode);
    }

    // --- Catalog ---

    /// Whether further pages exist.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether the load-more button is enabled.
    #[must_use]
    pub const fn can_load_more(&self) -> bool {
        !self.is_loading() && self.has_more()
    }

    /// Load-more button label.
    #[must_use]
    pub const fn load_more_label(&self) -> &'static str {
        if self.is_loading() {
            "Loading\u{2026}"
        } else if self.has_more() {
            "Load More"
        } else {
            "No more results"
        }
    }

    /// Requests the next page. Ignored while loading or on the last page.
    pub fn load_more(&mut self) -> Vec<Command> {
        if !self.can_load_more() {
            return Vec::new();
        }
        self.page = self.page.saturating_add(1);
        self.refresh(false)
    }

    /// Issues a catalog fetch when the (query, page) pair differs from the
    /// last one issued, or unconditionally when `force` is set.
    fn refresh(&mut self, force: bool) -> Vec<Command> {
        let request = CatalogRequest::new(self.debouncer.settled(), self.page);
        if !force && self.fetched.as_ref() == Some(&request) {
            return Vec::new();
        }

        let (id, superseded) = self.catalog.begin();
        if let Some(old) = superseded {
            tracing::debug!(%old, %id, "superseding catalog request");
        }
        self.catalog_phase = FetchPhase::Loading;
        self.error = None;
        self.fetched = Some(request.clone());
        vec![Command::FetchCatalog { id, request }]
    }

    fn resort(&mut self) {
        self.sorted = sorted_indices(self.results.movies(), self.sort);
        self.cursor = self.cursor.min(self.sorted.len().saturating_sub(1));
    }

    /// Applies a completed fetch. Results of superseded or cancelled
    /// requests are dropped without touching any state.
    pub fn apply(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Catalog {
                id,
                request,
                result,
            } => self.apply_catalog(id, &request, result),
            FetchMessage::Details {
                id,
                movie_id,
                result,
            } => self.apply_details(id, movie_id, result),
        }
    }

    fn apply_catalog(
        &mut self,
        id: RequestId,
        request: &CatalogRequest,
        result: Result<TmdbMovieListResponse>,
    ) {
        if !self.catalog.finish(id) {
            tracing::debug!(%id, %request, "dropping stale catalog response");
            return;
        }

        match result {
            Ok(response) => {
                self.total_pages = response.total_pages.max(1);
                if request.appends() {
                    self.results.append(response.results);
                } else {
                    self.results.replace(response.results);
                    self.cursor = 0;
                }
                self.resort();
                self.catalog_phase = FetchPhase::Success;
            }
            Err(e) => {
                tracing::error!(%request, error = %format!("{e:#}"), "catalog fetch failed");
                self.error = Some(FETCH_MOVIES_ERROR);
                self.catalog_phase = FetchPhase::Failed;
                if request.appends() {
                    // Step back so load-more retries the failed page.
                    self.page = request.page().saturating_sub(1).max(1);
                    self.fetched = None;
                } else {
                    // The kept results belong to an earlier query; later
                    // pages of this one must not be appended to them.
                    self.total_pages = 1;
                }
            }
        }
    }

    fn apply_details(&mut self, id: RequestId, movie_id: u64, result: Result<TmdbMovieDetails>) {
        if self.selected_id != Some(movie_id) || !self.detail.finish(id) {
            tracing::debug!(%id, movie_id, "dropping stale detail response");
            return;
        }

        match result {
            Ok(details) => {
                self.poster = Poster::from_path(details.poster_path.as_deref());
                self.details = Some(DetailView::from_details(&details));
                self.detail_phase = FetchPhase::Success;
            }
            Err(e) => {
                tracing::error!(movie_id, error = %format!("{e:#}"), "detail fetch failed");
                self.details_error = Some(LOAD_DETAILS_ERROR);
                self.detail_phase = FetchPhase::Failed;
            }
        }
        let controls = self.dialog_controls();
        if let Some(ref mut trap) = self.dialog {
            trap.revalidate(&controls);
        }
    }

    // --- Detail dialog ---

    /// Opens the dialog for `movie_id` and starts its detail fetch.
    pub fn open_details(&mut self, movie_id: u64) -> Vec<Command> {
        self.selected_id = Some(movie_id);
        self.details = None;
        self.details_error = None;
        self.poster = Poster::Placeholder;

        let (id, superseded) = self.detail.begin();
        if let Some(old) = superseded {
            tracing::debug!(%old, %id, "superseding detail request");
        }
        self.detail_phase = FetchPhase::Loading;

        let controls = self.dialog_controls();
        let restore = self.dialog.take().map_or(self.focus, FocusTrap::close);
        self.dialog = Some(FocusTrap::open(restore, &controls));
        vec![Command::FetchDetails { id, movie_id }]
    }

    /// Opens the dialog for the movie under the card cursor.
    pub fn open_selected(&mut self) -> Vec<Command> {
        match self.current_movie().map(|m| m.id) {
            Some(movie_id) => self.open_details(movie_id),
            None => Vec::new(),
        }
    }

    /// Closes the dialog, discarding its data, and restores focus.
    pub fn close_details(&mut self) -> Vec<Command> {
        self.selected_id = None;
        self.details = None;
        self.details_error = None;
        self.poster = Poster::Placeholder;
        self.detail_phase = FetchPhase::Idle;
        if let Some(trap) = self.dialog.take() {
            self.focus = trap.close();
        }
        match self.detail.cancel() {
            Some(id) => {
                tracing::debug!(%id, "cancelling detail request");
                vec![Command::CancelDetails]
            }
            None => Vec::new(),
        }
    }

    /// Focusable dialog controls for the current dialog content.
    #[must_use]
    pub fn dialog_controls(&self) -> Vec<DialogControl> {
        let mut controls = vec![DialogControl::Close];
        if let Some(ref details) = self.details {
            if self.poster.url().is_some() {
                controls.push(DialogControl::Poster);
            }
            if details.trailer_url.is_some() {
                controls.push(DialogControl::Trailer);
            }
        }
        controls
    }

    /// Tab / Shift+Tab inside the dialog.
    pub fn dialog_tab(&mut self, backwards: bool) {
        let controls = self.dialog_controls();
        if let Some(ref mut trap) = self.dialog {
            trap.cycle(&controls, backwards);
        }
    }

    /// Activates the focused dialog control.
    pub fn activate_dialog(&mut self) -> Vec<Command> {
        match self.dialog_focus() {
            Some(DialogControl::Close) => self.close_details(),
            Some(DialogControl::Poster) => self
                .poster
                .url()
                .map(|url| Command::OpenLink {
                    kind: LinkKind::Poster,
                    url: String::from(url),
                })
                .into_iter()
                .collect(),
            Some(DialogControl::Trailer) => self
                .details
                .as_ref()
                .and_then(|d| d.trailer_url.clone())
                .map(|url| Command::OpenLink {
                    kind: LinkKind::Trailer,
                    url,
                })
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Records that opening a link failed. A poster falls back to the
    /// placeholder once.
    pub fn link_failed(&mut self, kind: LinkKind) {
        if kind == LinkKind::Poster && self.poster.fail() {
            let controls = self.dialog_controls();
            if let Some(ref mut trap) = self.dialog {
                trap.revalidate(&controls);
            }
        }
    }

    // --- Main screen focus and grid ---

    /// Focusable main-screen controls. The grid is skipped while empty.
    #[must_use]
    pub fn main_controls(&self) -> Vec<Focus> {
        let mut controls = vec![
            Focus::SearchInput,
            Focus::SearchButton,
            Focus::ClearButton,
            Focus::SortSelect,
        ];
        if !self.sorted.is_empty() {
            controls.push(Focus::Results);
        }
        controls.push(Focus::LoadMore);
        controls
    }

    /// Tab / Shift+Tab on the main screen.
    pub fn focus_next(&mut self, backwards: bool) {
        let controls = self.main_controls();
        if let Some(next) = focus::cycle(&controls, Some(self.focus), backwards) {
            self.focus = next;
        }
    }

    /// Moves focus to `target`.
    pub const fn set_focus(&mut self, target: Focus) {
        self.focus = target;
    }

    /// Moves the card cursor within the grid.
    pub fn move_cursor(&mut self, direction: Move) {
        let last = self.sorted.len().saturating_sub(1);
        if self.sorted.is_empty() {
            return;
        }
        self.cursor = match direction {
            Move::Left => self.cursor.saturating_sub(1),
            Move::Right => self.cursor.saturating_add(1).min(last),
            Move::Up => self.cursor.checked_sub(self.columns).unwrap_or(self.cursor),
            Move::Down => {
                let next = self.cursor.saturating_add(self.columns);
                if next <= last { next } else { self.cursor }
            }
        };
    }

    /// Updates the grid column count from the rendered layout.
    pub fn set_grid_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }
}
