//! Updates engine: feed IO and effect execution.
mod decode;
mod engine;
mod fetch;
mod types;

pub use decode::{decode_page, DecodedPage, RecordError};
pub use engine::EngineHandle;
pub use fetch::{FeedSource, FetchSettings, ReqwestFeedSource, UPDATE_PATH};
pub use types::{EngineEvent, FailureKind, FetchError, FetchedPage};
