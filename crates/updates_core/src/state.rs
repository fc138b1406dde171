use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::view_model::{FeedViewModel, LoadMoreState, UpdateRowView, EMPTY_FEED_MESSAGE};
use crate::{ChapterId, PageResult, UpdateRecord};

pub type SessionId = u64;

/// Number of records requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// What to do with a record whose chapter is already in the list.
///
/// The feed is trusted to not repeat itself, so the default keeps everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    #[default]
    KeepAll,
    DropRepeatedChapters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing mounted yet.
    #[default]
    Idle,
    Active,
    /// View torn down; late results are ignored until the next `Initialize`.
    Closed,
}

/// Pagination state for one feed session. Only `update` mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    session: SessionState,
    session_id: SessionId,
    page_cursor: u32,
    accumulated: Vec<UpdateRecord>,
    exhausted: bool,
    in_flight: Option<u32>,
    page_size: u32,
    dedup: DedupPolicy,
    last_error: Option<String>,
    skipped_records: usize,
    dirty: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            session: SessionState::Idle,
            session_id: 0,
            page_cursor: 1,
            accumulated: Vec::new(),
            exhausted: false,
            in_flight: None,
            page_size: DEFAULT_PAGE_SIZE,
            dedup: DedupPolicy::KeepAll,
            last_error: None,
            skipped_records: 0,
            dirty: false,
        }
    }
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page size is clamped to at least one record.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The next page that will be requested.
    pub fn page_cursor(&self) -> u32 {
        self.page_cursor
    }

    pub fn accumulated(&self) -> &[UpdateRecord] {
        &self.accumulated
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_load_more(&self) -> bool {
        !self.exhausted
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn dedup(&self) -> DedupPolicy {
        self.dedup
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Builds the view model. Age labels are computed against `now` on every call.
    pub fn view(&self, now: DateTime<Utc>) -> FeedViewModel {
        let load_more = if self.exhausted {
            LoadMoreState::NoMore
        } else if self.in_flight.is_some() {
            LoadMoreState::Loading
        } else {
            LoadMoreState::Ready
        };
        let empty_message = (self.exhausted && self.accumulated.is_empty())
            .then_some(EMPTY_FEED_MESSAGE);

        FeedViewModel {
            rows: self
                .accumulated
                .iter()
                .map(|record| UpdateRowView::from_record(record, now))
                .collect(),
            load_more,
            can_load_more: self.can_load_more(),
            empty_message,
            last_error: self.last_error.clone(),
            skipped_records: self.skipped_records,
        }
    }

    /// Starts a fresh session: page 1, empty list, not exhausted.
    pub(crate) fn reset_session(&mut self) -> SessionId {
        self.session_id = self.session_id.wrapping_add(1);
        self.session = SessionState::Active;
        self.page_cursor = 1;
        self.accumulated.clear();
        self.exhausted = false;
        self.in_flight = None;
        self.last_error = None;
        self.skipped_records = 0;
        self.dirty = true;
        self.session_id
    }

    /// Marks the page at the cursor as in flight, unless loading is not allowed right now.
    pub(crate) fn begin_request(&mut self) -> Option<(SessionId, u32)> {
        if self.session != SessionState::Active || self.exhausted || self.in_flight.is_some() {
            return None;
        }
        self.in_flight = Some(self.page_cursor);
        self.dirty = true;
        Some((self.session_id, self.page_cursor))
    }

    /// Applies a completed request. Returns false when the result does not belong to
    /// the request currently in flight, in which case nothing changes.
    pub(crate) fn apply_page_result(
        &mut self,
        session: SessionId,
        page: u32,
        result: PageResult,
    ) -> bool {
        if self.session != SessionState::Active
            || self.session_id != session
            || self.in_flight != Some(page)
        {
            return false;
        }
        self.in_flight = None;
        self.dirty = true;

        if result.is_terminal() {
            self.exhausted = true;
            self.last_error = None;
            return true;
        }

        match result {
            PageResult::Page { records, skipped } => {
                self.append(records);
                self.skipped_records += skipped;
                self.page_cursor += 1;
                self.last_error = None;
            }
            PageResult::Failure(reason) => {
                self.last_error = Some(reason);
            }
            PageResult::Exhausted => {}
        }
        true
    }

    /// Closes the session. Returns the session id if a request was still outstanding.
    pub(crate) fn close_session(&mut self) -> Option<SessionId> {
        if self.session != SessionState::Active {
            return None;
        }
        self.session = SessionState::Closed;
        self.dirty = true;
        self.in_flight.take().map(|_| self.session_id)
    }

    fn append(&mut self, records: Vec<UpdateRecord>) {
        match self.dedup {
            DedupPolicy::KeepAll => self.accumulated.extend(records),
            DedupPolicy::DropRepeatedChapters => {
                let mut seen: HashSet<ChapterId> = self
                    .accumulated
                    .iter()
                    .map(|record| record.chapter_id.clone())
                    .collect();
                self.accumulated.extend(
                    records
                        .into_iter()
                        .filter(|record| seen.insert(record.chapter_id.clone())),
                );
            }
        }
    }
}
