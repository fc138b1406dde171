use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use updates_core::{ChapterId, UpdateRecord};
use updates_logging::updates_warn;

use crate::{FailureKind, FetchError};

const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub records: Vec<UpdateRecord>,
    pub skipped: usize,
}

/// Why a single feed entry was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("unexpected shape: {0}")]
    Shape(String),
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("invalid timestamp {0:?}")]
    BadTimestamp(String),
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(rename = "ChapterID")]
    chapter_id: Option<Scalar>,
    #[serde(rename = "MangaTitle")]
    manga_title: Option<String>,
    #[serde(rename = "ChapterTitle")]
    chapter_title: Option<String>,
    #[serde(rename = "ChapterNumber")]
    chapter_number: Option<Scalar>,
    #[serde(rename = "CoverURL")]
    cover_url: Option<String>,
    #[serde(rename = "UploadedAt")]
    uploaded_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number_text(&number),
        }
    }
}

/// Largest integer an f64 holds exactly.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Integral floats print without a fraction, so `1.0` reads as `1` like it does in a browser.
fn number_text(number: &serde_json::Number) -> String {
    if number.is_f64() {
        if let Some(value) = number.as_f64() {
            if value.fract() == 0.0 && value.abs() <= MAX_EXACT_FLOAT_INT {
                return format!("{}", value as i64);
            }
        }
    }
    number.to_string()
}

/// Decode one page body. The body must be a JSON array (or `null`, or empty);
/// entries that do not describe a complete update are skipped and counted.
pub fn decode_page(bytes: &[u8]) -> Result<DecodedPage, FetchError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(DecodedPage {
            records: Vec::new(),
            skipped: 0,
        });
    }

    let items: Option<Vec<Value>> = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
    let items = items.unwrap_or_default();

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.iter().enumerate() {
        match decode_record(item) {
            Ok(record) => records.push(record),
            Err(err) => {
                updates_warn!("Skipping malformed update record #{}: {}", index, err);
                skipped += 1;
            }
        }
    }

    Ok(DecodedPage { records, skipped })
}

fn decode_record(item: &Value) -> Result<UpdateRecord, RecordError> {
    let wire = WireRecord::deserialize(item).map_err(|err| RecordError::Shape(err.to_string()))?;

    let chapter_id = wire
        .chapter_id
        .map(Scalar::into_text)
        .filter(|id| !id.is_empty())
        .ok_or(RecordError::MissingField("ChapterID"))?;
    let uploaded_at = wire
        .uploaded_at
        .ok_or(RecordError::MissingField("UploadedAt"))?;

    Ok(UpdateRecord {
        chapter_id: ChapterId::new(chapter_id),
        manga_title: wire
            .manga_title
            .ok_or(RecordError::MissingField("MangaTitle"))?,
        chapter_title: wire
            .chapter_title
            .ok_or(RecordError::MissingField("ChapterTitle"))?,
        chapter_number: wire
            .chapter_number
            .map(Scalar::into_text)
            .ok_or(RecordError::MissingField("ChapterNumber"))?,
        cover_url: wire.cover_url.ok_or(RecordError::MissingField("CoverURL"))?,
        uploaded_at: parse_uploaded_at(&uploaded_at)?,
    })
}

/// Accepts RFC 3339, or `YYYY-MM-DD HH:MM:SS` taken as UTC.
fn parse_uploaded_at(value: &str) -> Result<DateTime<Utc>, RecordError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, NAIVE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| RecordError::BadTimestamp(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numeric_and_text_identifiers_are_accepted() {
        let body = br#"[
            {"ChapterID": 7, "MangaTitle": "A", "ChapterTitle": "B", "ChapterNumber": 12.5,
             "CoverURL": "c", "UploadedAt": "2024-01-02T03:04:05Z"},
            {"ChapterID": "ch-8", "MangaTitle": "A", "ChapterTitle": "B", "ChapterNumber": "Extra",
             "CoverURL": "c", "UploadedAt": "2024-01-02 03:04:05"}
        ]"#;
        let page = decode_page(body).unwrap();

        assert_eq!(page.skipped, 0);
        assert_eq!(page.records[0].chapter_id.as_str(), "7");
        assert_eq!(page.records[0].chapter_number, "12.5");
        assert_eq!(page.records[1].chapter_id.as_str(), "ch-8");
        assert_eq!(page.records[1].chapter_number, "Extra");
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(page.records[0].uploaded_at, expected);
        assert_eq!(page.records[1].uploaded_at, expected);
    }

    #[test]
    fn integral_float_chapter_numbers_drop_the_fraction() {
        let body = br#"[
            {"ChapterID": 3.0, "MangaTitle": "A", "ChapterTitle": "B", "ChapterNumber": 1.0,
             "CoverURL": "c", "UploadedAt": "2024-01-02T03:04:05Z"},
            {"ChapterID": 4, "MangaTitle": "A", "ChapterTitle": "B", "ChapterNumber": -0.0,
             "CoverURL": "c", "UploadedAt": "2024-01-02T03:04:05Z"},
            {"ChapterID": 5, "MangaTitle": "A", "ChapterTitle": "B", "ChapterNumber": 1e300,
             "CoverURL": "c", "UploadedAt": "2024-01-02T03:04:05Z"}
        ]"#;
        let page = decode_page(body).unwrap();

        assert_eq!(page.records[0].chapter_id.as_str(), "3");
        assert_eq!(page.records[0].chapter_number, "1");
        assert_eq!(page.records[1].chapter_number, "0");
        assert_eq!(page.records[2].chapter_number, "1e300");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let parsed = parse_uploaded_at("2024-01-02T05:04:05+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let body = br#"[
            {"ChapterID": 1, "MangaTitle": "ok", "ChapterTitle": "t", "ChapterNumber": 1,
             "CoverURL": "c", "UploadedAt": "2024-01-02T03:04:05Z"},
            {"ChapterID": 2, "ChapterTitle": "t", "ChapterNumber": 1,
             "CoverURL": "c", "UploadedAt": "2024-01-02T03:04:05Z"},
            {"ChapterID": 3, "MangaTitle": "bad date", "ChapterTitle": "t", "ChapterNumber": 1,
             "CoverURL": "c", "UploadedAt": "yesterday"},
            "not an object",
            {"ChapterID": "", "MangaTitle": "x", "ChapterTitle": "t", "ChapterNumber": 1,
             "CoverURL": "c", "UploadedAt": "2024-01-02T03:04:05Z"}
        ]"#;
        let page = decode_page(body).unwrap();

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].manga_title, "ok");
        assert_eq!(page.skipped, 4);
    }

    #[test]
    fn record_errors_name_the_problem() {
        let missing = serde_json::json!({"ChapterID": 1});
        assert_eq!(
            decode_record(&missing).unwrap_err(),
            RecordError::MissingField("UploadedAt")
        );
        let bad_date = serde_json::json!({
            "ChapterID": 1, "MangaTitle": "m", "ChapterTitle": "t", "ChapterNumber": 1,
            "CoverURL": "c", "UploadedAt": "soon"
        });
        assert_eq!(
            decode_record(&bad_date).unwrap_err(),
            RecordError::BadTimestamp("soon".to_string())
        );
    }

    #[test]
    fn null_and_blank_bodies_are_empty_pages() {
        assert_eq!(decode_page(b"null").unwrap().records.len(), 0);
        assert_eq!(decode_page(b"  \n").unwrap().skipped, 0);
        assert_eq!(decode_page(b"[]").unwrap().records.len(), 0);
    }

    #[test]
    fn non_array_body_is_a_decode_failure() {
        let err = decode_page(br#"{"error": "boom"}"#).unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
    }
}
