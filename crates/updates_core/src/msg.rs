use crate::{SessionId, UpdateRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// View mounted or reloaded: start a fresh session at page 1.
    Initialize,
    /// User asked for the next page.
    LoadMoreClicked,
    /// Engine completion for a page request.
    PageLoaded {
        session: SessionId,
        page: u32,
        result: PageResult,
    },
    /// View torn down; results still in flight are discarded.
    Closed,
}

/// Outcome of one page request, as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    /// The feed answered with a page. `skipped` counts records that were
    /// dropped while decoding because they were malformed.
    Page {
        records: Vec<UpdateRecord>,
        skipped: usize,
    },
    /// The feed signalled that it has nothing more to give.
    Exhausted,
    /// Transient failure; the same page may be requested again.
    Failure(String),
}

impl PageResult {
    /// A page with no records and nothing skipped means the server ran dry.
    pub fn is_terminal(&self) -> bool {
        match self {
            PageResult::Page { records, skipped } => records.is_empty() && *skipped == 0,
            PageResult::Exhausted => true,
            PageResult::Failure(_) => false,
        }
    }
}
