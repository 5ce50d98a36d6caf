//! The list view controller.
//!
//! [`ListController`] owns the filter, pagination and sort state of one list
//! screen and is the single source of truth for them. The URL location is a
//! projection it writes to; it is read once, on mount.
//!
//! The controller performs no I/O. Every transition that needs data returns
//! a [`PendingFetch`]; whoever drives the controller runs the request and
//! reports back through [`ListController::complete`]. Because several fetches
//! may be in flight at once, completions carry the token they were issued
//! with.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use crate::error::Result;
use crate::notify::MutationOutcome;
use crate::query::pagination::{LIMIT_KEY, OFFSET_KEY};
use crate::query::{
    FilterSet, FilterValue, Location, PaginationDefaults, PaginationState, SortDirection,
    SortState,
};
use crate::remote::{
    FetchOutcome, ListPage, ListRequest, RemoteResult, downgrade_bad_identifier,
};
use crate::types::{Identity, PrivilegeTier};

use super::entity::ListEntity;
use super::state::{ListMode, ListPhase, Row, RowView, SelectionSet, SoftError};

/// A fetch the driver must run and report back with [`ListController::complete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub token: u64,
    pub request: ListRequest,
}

/// What [`ListController::complete`] did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Older than the latest issued fetch, dropped
    Stale,
    /// The token was never issued or already completed
    Unknown,
}

/// Settings a controller is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    pub mode: ListMode,
    pub tier: PrivilegeTier,
    pub pagination: PaginationDefaults,
    /// Drop responses older than the latest issued fetch
    pub discard_stale_responses: bool,
}

impl ListOptions {
    pub fn modal(mut self) -> Self {
        self.mode = ListMode::Modal;
        self
    }

    /// Default pagination for this list. Modal lists always use the standard page size.
    pub fn default_pagination(&self) -> PaginationState {
        match self.mode {
            ListMode::Routed => self.pagination.for_tier(self.tier),
            ListMode::Modal => self.pagination.for_tier(PrivilegeTier::Standard),
        }
    }
}

pub struct ListController<E: ListEntity> {
    options: ListOptions,
    location: Location,
    filters: FilterSet,
    pagination: PaginationState,
    sort: SortState,
    phase: ListPhase,
    soft_error: Option<SoftError>,
    rows: Vec<Row<E::Record>>,
    selection: SelectionSet,
    next_token: u64,
    latest_issued: u64,
    in_flight: BTreeSet<u64>,
    _entity: PhantomData<E>,
}

impl<E: ListEntity> std::fmt::Debug for ListController<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("entity", &E::NAME)
            .field("mode", &self.options.mode)
            .field("location", &self.location.to_string())
            .field("filters", &self.filters)
            .field("pagination", &self.pagination)
            .field("sort", &self.sort)
            .field("phase", &self.phase)
            .field("rows", &self.rows.len())
            .field("selection", &self.selection.len())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl<E: ListEntity> ListController<E> {
    /// A controller for a screen at `location`. Nothing is read until [`mount`](Self::mount).
    pub fn new(options: ListOptions, location: Location) -> Self {
        Self {
            options,
            location,
            filters: E::filter_schema().default_set(),
            pagination: options.default_pagination(),
            sort: E::default_sort(),
            phase: ListPhase::Idle,
            soft_error: None,
            rows: Vec::new(),
            selection: SelectionSet::new(),
            next_token: 1,
            latest_issued: 0,
            in_flight: BTreeSet::new(),
            _entity: PhantomData,
        }
    }

    /// A controller for the entity's own route
    pub fn routed(options: ListOptions) -> Self {
        Self::new(options, Location::new(E::PATH, Default::default()))
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Read the initial state and issue the first fetch.
    ///
    /// A routed list decodes filters and pagination from its location and
    /// writes the normalized pagination back when the URL lacked it or it was
    /// out of range. A modal list starts from the defaults.
    pub fn mount(&mut self) -> PendingFetch {
        let default = self.options.default_pagination();
        match self.options.mode {
            ListMode::Routed => {
                let search = self.location.search().clone();
                self.filters = E::filter_schema().decode(&search);
                self.pagination = PaginationState::decode(&search, default);

                let redirected = self.pagination.take_redirect();
                if redirected || !PaginationState::is_present(&search) {
                    tracing::debug!(
                        "{} list: normalizing pagination in URL (redirected: {redirected})",
                        E::NAME
                    );
                    self.write_url();
                }
            }
            ListMode::Modal => {
                self.filters = E::filter_schema().default_set();
                self.pagination = default;
            }
        }
        self.sort = E::default_sort();
        self.issue_fetch()
    }

    /// Merge a partial filter change and go back to the first page.
    ///
    /// Keys not named in `patch` keep their value; an empty value clears a
    /// key. Fails without changing anything if `patch` names an unknown key.
    pub fn edit_filters<I, K>(&mut self, patch: I) -> Result<PendingFetch>
    where
        I: IntoIterator<Item = (K, FilterValue)>,
        K: Into<String>,
    {
        E::filter_schema().merge(&mut self.filters, patch)?;
        self.pagination = self.pagination.first_page();
        self.write_url();
        Ok(self.issue_fetch())
    }

    /// Remove every filter constraint and go back to the first page
    pub fn clear_filters(&mut self) -> PendingFetch {
        self.filters = FilterSet::new();
        self.pagination = self.pagination.first_page();
        self.write_url();
        self.issue_fetch()
    }

    /// Go to a 1-based page; filters are carried through
    pub fn change_page(&mut self, page: u32) -> PendingFetch {
        self.pagination = self.pagination.with_page(page.max(1));
        self.write_url();
        self.issue_fetch()
    }

    /// Change the page size, keeping the first row of the current page visible
    pub fn change_limit(&mut self, limit: u32) -> PendingFetch {
        self.pagination = self.pagination.with_limit(limit);
        self.write_url();
        self.issue_fetch()
    }

    pub fn change_sort(
        &mut self,
        column_index: usize,
        direction: SortDirection,
    ) -> Result<PendingFetch> {
        self.sort = SortState::new(E::columns(), E::NAME, column_index, direction)?;
        self.write_url();
        Ok(self.issue_fetch())
    }

    /// Re-issue the current request unchanged
    pub fn refresh(&mut self) -> PendingFetch {
        self.issue_fetch()
    }

    /// Forget an issued fetch that will never be run
    pub fn abandon(&mut self, token: u64) -> bool {
        self.in_flight.remove(&token)
    }

    /// Return to the first page with no filters, without fetching
    pub fn reset_view(&mut self) {
        self.filters = FilterSet::new();
        self.pagination = self.pagination.first_page();
        self.selection.clear();
        self.write_url();
    }

    /// Apply the result of a fetch issued with `token`.
    ///
    /// By default every response is applied as it resolves, so a slow older
    /// response can replace the rows of a newer one. With
    /// `discard_stale_responses` such a response is dropped instead.
    pub fn complete(
        &mut self,
        token: u64,
        result: RemoteResult<ListPage<E::Record>>,
    ) -> Completion {
        if !self.in_flight.remove(&token) {
            tracing::debug!("{} list: ignoring unknown fetch #{token}", E::NAME);
            return Completion::Unknown;
        }

        if self.options.discard_stale_responses && token < self.latest_issued {
            tracing::debug!(
                "{} list: dropping stale fetch #{token} (latest #{})",
                E::NAME,
                self.latest_issued
            );
            return Completion::Stale;
        }

        match downgrade_bad_identifier(result) {
            Ok(FetchOutcome::Loaded(page)) => {
                tracing::debug!(
                    "{} list: fetch #{token} loaded {} of {} rows",
                    E::NAME,
                    page.items.len(),
                    page.meta.count
                );
                self.pagination.count = Some(page.meta.count);
                self.rows = page
                    .items
                    .into_iter()
                    .map(|record| Row {
                        uuid: E::row_id(&record),
                        label: E::row_label(&record),
                        record,
                    })
                    .collect();
                self.soft_error = None;
                self.phase = ListPhase::Ready;
            }
            Ok(FetchOutcome::BadIdentifier) => {
                self.rows.clear();
                self.pagination.count = Some(0);
                self.soft_error = Some(SoftError::BadIdentifier);
                self.phase = ListPhase::Ready;
            }
            Err(err) => {
                tracing::warn!("{} list: fetch #{token} failed: {err}", E::NAME);
                self.phase = ListPhase::Error(err);
            }
        }
        Completion::Applied
    }

    /// React to a settled row mutation.
    ///
    /// A fulfilled mutation clears the selection and re-fetches the current
    /// request so the rows show server state. A rejected one changes nothing.
    pub fn on_mutation_settled<T>(&mut self, outcome: &MutationOutcome<T>) -> Option<PendingFetch> {
        match outcome {
            MutationOutcome::Fulfilled(_) => {
                self.selection.clear();
                Some(self.issue_fetch())
            }
            MutationOutcome::Rejected(_) => None,
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Flip the selection of a row on the current page
    pub fn toggle_row(&mut self, uuid: &str) -> bool {
        match self.rows.iter().find(|r| r.uuid == uuid) {
            Some(row) => self.selection.toggle(&row.uuid, &row.label),
            None => false,
        }
    }

    /// Select every row on the current page
    pub fn select_page(&mut self) {
        for row in &self.rows {
            self.selection.select(&row.uuid, &row.label);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The request the next fetch would send
    pub fn current_request(&self) -> ListRequest {
        ListRequest {
            filters: self.filters.clone(),
            limit: self.pagination.limit,
            offset: self.pagination.offset,
            order_by: self.sort.order_by(E::columns()),
            in_modal: self.options.mode == ListMode::Modal,
        }
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn soft_error(&self) -> Option<SoftError> {
        self.soft_error
    }

    pub fn rows(&self) -> &[Row<E::Record>] {
        &self.rows
    }

    pub fn row(&self, uuid: &str) -> Option<&Row<E::Record>> {
        self.rows.iter().find(|r| r.uuid == uuid)
    }

    /// Rows as rendered for `identity`
    pub fn row_views(&self, identity: &Identity) -> Vec<RowView> {
        self.rows
            .iter()
            .map(|row| RowView {
                uuid: row.uuid.clone(),
                cells: E::cells(&row.record),
                selected: self.selection.contains(&row.uuid),
                control_disabled: E::control_disabled(&row.record, identity),
            })
            .collect()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn mode(&self) -> ListMode {
        self.options.mode
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Number of issued fetches that have not completed
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn issue_fetch(&mut self) -> PendingFetch {
        let token = self.next_token;
        self.next_token += 1;
        self.latest_issued = token;
        self.in_flight.insert(token);
        self.phase = ListPhase::Loading;

        let request = self.current_request();
        tracing::debug!("{} list: issuing fetch #{token}: {request:?}", E::NAME);
        PendingFetch { token, request }
    }

    /// Mirror filters and pagination into the location. Modal lists never write.
    fn write_url(&mut self) {
        if self.options.mode == ListMode::Modal {
            return;
        }

        let schema = E::filter_schema();
        let mut search = self.location.search().clone();
        for key in schema.keys {
            search.remove(key.name);
        }
        search.remove(LIMIT_KEY);
        search.remove(OFFSET_KEY);

        search.overlay(&self.pagination.encode());
        search.overlay(&schema.encode(&self.filters));
        self.location.replace_search(search);
    }
}
