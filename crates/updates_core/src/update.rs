use updates_logging::{updates_debug, updates_info, updates_warn};

use crate::{Effect, Msg, PageResult, PaginationState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PaginationState, msg: Msg) -> (PaginationState, Vec<Effect>) {
    let effects = match msg {
        Msg::Initialize => {
            let mut effects = Vec::with_capacity(2);
            if let Some(previous) = state.close_session() {
                effects.push(Effect::CancelSession { session: previous });
            }
            let session = state.reset_session();
            updates_info!("Feed session {} started", session);
            effects.extend(request_next_page(&mut state));
            effects
        }
        Msg::LoadMoreClicked => request_next_page(&mut state).into_iter().collect(),
        Msg::PageLoaded {
            session,
            page,
            result,
        } => {
            let summary = describe(&result);
            if state.apply_page_result(session, page, result) {
                match state.last_error() {
                    Some(reason) => {
                        updates_warn!("Session {} page {} failed: {}", session, page, reason)
                    }
                    None if state.is_exhausted() => {
                        updates_info!("Session {} feed exhausted at page {}", session, page)
                    }
                    None => updates_debug!("Session {} page {}: {}", session, page, summary),
                }
            } else {
                updates_debug!(
                    "Discarding stale result for session {} page {} ({})",
                    session,
                    page,
                    summary
                );
            }
            Vec::new()
        }
        Msg::Closed => match state.close_session() {
            Some(session) => vec![Effect::CancelSession { session }],
            None => Vec::new(),
        },
    };

    (state, effects)
}

fn request_next_page(state: &mut PaginationState) -> Option<Effect> {
    let Some((session, page)) = state.begin_request() else {
        updates_debug!(
            "Ignoring page request (session {:?}, exhausted {}, loading {})",
            state.session(),
            state.is_exhausted(),
            state.is_loading()
        );
        return None;
    };
    updates_debug!(
        "Session {} requesting page {} (limit {})",
        session,
        page,
        state.page_size()
    );
    Some(Effect::FetchPage {
        session,
        page,
        limit: state.page_size(),
    })
}

fn describe(result: &PageResult) -> String {
    match result {
        PageResult::Page { records, skipped } => {
            format!("{} records, {} skipped", records.len(), skipped)
        }
        PageResult::Exhausted => "exhausted".to_string(),
        PageResult::Failure(reason) => format!("failure: {reason}"),
    }
}
