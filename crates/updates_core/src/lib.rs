//! Updates core: pure pagination state machine, relative-age formatting and view-model helpers.
mod age;
mod effect;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use age::{age_from_days, elapsed_days, relative_age, AgeLabel};
pub use effect::Effect;
pub use msg::{Msg, PageResult};
pub use record::{ChapterId, UpdateRecord};
pub use state::{DedupPolicy, PaginationState, SessionId, SessionState, DEFAULT_PAGE_SIZE};
pub use update::update;
pub use view_model::{
    chapter_route, proxied_cover_url, FeedViewModel, LoadMoreState, UpdateRowView,
    EMPTY_FEED_MESSAGE,
};
