use crate::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Request one page of the update feed.
    FetchPage {
        session: SessionId,
        page: u32,
        limit: u32,
    },
    /// Abandon any outstanding request belonging to `session`.
    CancelSession { session: SessionId },
}
