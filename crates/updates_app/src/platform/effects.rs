use updates_core::{Effect, Msg, PageResult};
use updates_engine::{EngineEvent, EngineHandle, FetchError, FetchedPage};
use updates_logging::{updates_info, updates_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage {
                    session,
                    page,
                    limit,
                } => {
                    updates_info!(
                        "FetchPage session={} page={} limit={}",
                        session,
                        page,
                        limit
                    );
                    self.engine.fetch_page(session, page, limit);
                }
                Effect::CancelSession { session } => {
                    self.engine.cancel(session);
                }
            }
        }
    }

    /// Drains finished engine work into messages for the state machine.
    pub fn poll(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            match event {
                EngineEvent::PageFetched {
                    session,
                    page,
                    result,
                } => inbox.push(Msg::PageLoaded {
                    session,
                    page,
                    result: map_result(result),
                }),
            }
        }
        inbox
    }
}

pub fn map_result(result: Result<FetchedPage, FetchError>) -> PageResult {
    match result {
        Ok(FetchedPage::Records { records, skipped }) => PageResult::Page { records, skipped },
        Ok(FetchedPage::NoContent) => PageResult::Exhausted,
        Err(err) => {
            updates_warn!("Page request failed: {}", err);
            PageResult::Failure(err.to_string())
        }
    }
}
