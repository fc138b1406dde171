use chrono::{DateTime, Utc};

use crate::{relative_age, ChapterId, UpdateRecord};

/// Shown instead of the list when the feed ran dry before yielding anything.
pub const EMPTY_FEED_MESSAGE: &str = "No recent updates";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMoreState {
    #[default]
    Ready,
    Loading,
    NoMore,
}

impl LoadMoreState {
    pub fn label(self) -> &'static str {
        match self {
            LoadMoreState::Ready => "Load More",
            LoadMoreState::Loading => "Loading...",
            LoadMoreState::NoMore => "No More",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedViewModel {
    pub rows: Vec<UpdateRowView>,
    pub load_more: LoadMoreState,
    pub can_load_more: bool,
    pub empty_message: Option<&'static str>,
    pub last_error: Option<String>,
    pub skipped_records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRowView {
    pub chapter_id: ChapterId,
    pub manga_title: String,
    /// "<chapter title> - <chapter number>"
    pub chapter_line: String,
    pub age_label: String,
    pub chapter_route: String,
    pub cover_src: String,
}

impl UpdateRowView {
    pub(crate) fn from_record(record: &UpdateRecord, now: DateTime<Utc>) -> Self {
        Self {
            chapter_id: record.chapter_id.clone(),
            manga_title: record.manga_title.clone(),
            chapter_line: format!("{} - {}", record.chapter_title, record.chapter_number),
            age_label: relative_age(record.uploaded_at, now).to_string(),
            chapter_route: chapter_route(&record.chapter_id),
            cover_src: proxied_cover_url(&record.cover_url),
        }
    }
}

/// Route of the reader view for a chapter.
pub fn chapter_route(chapter_id: &ChapterId) -> String {
    format!("/chapter/{chapter_id}")
}

/// Rewrites an upstream cover URL so it is fetched through the backend image proxy.
pub fn proxied_cover_url(cover_url: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", cover_url)
        .finish();
    format!("/api/proxy?{query}")
}
