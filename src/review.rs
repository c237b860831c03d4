//! The review record and the validation of incoming submissions.

use std::num::{IntErrorKind, ParseIntError};

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lowest and highest rating a submission may carry.
pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// One visitor review as stored in the review document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub display_name: String,
    /// Any integer is accepted when loading; only submissions are range-checked.
    pub rating: i64,
    pub review_text: String,
    /// ISO-8601, kept verbatim so documents from older deployments load unchanged.
    pub timestamp: String,
}

impl Review {
    /// Builds a review stamped with `now`.
    pub fn new(submission: Submission, now: DateTime<Utc>) -> Self {
        Self {
            display_name: submission.display_name,
            rating: submission.rating,
            review_text: submission.review_text,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    /// Parses `timestamp`, accepting RFC 3339 and offset-less ISO-8601
    /// (read as UTC). `None` if it is neither.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(ts);
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    }
}

/// A validated `POST /submit_review` payload.
#[derive(Debug, PartialEq, Eq)]
pub struct Submission {
    pub display_name: String,
    pub rating: i64,
    pub review_text: String,
}

/// Why a submission was refused.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("request body is not valid JSON")]
    MalformedJson,

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must be a string")]
    NotAString(&'static str),

    #[error("rating must be an integer")]
    RatingNotInteger,

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(String),
}

impl SubmissionError {
    /// Out-of-range ratings are well-formed but unacceptable; everything else
    /// is a malformed request.
    pub fn is_unprocessable(&self) -> bool {
        matches!(self, Self::RatingOutOfRange(_))
    }
}

impl Submission {
    /// Validates a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, SubmissionError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| SubmissionError::MalformedJson)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, SubmissionError> {
        let fields = value.as_object().ok_or(SubmissionError::NotAnObject)?;

        let display_name = string_field(fields, "displayName")?;
        let review_text = string_field(fields, "reviewText")?;
        let rating = fields
            .get("rating")
            .ok_or(SubmissionError::MissingField("rating"))
            .and_then(coerce_rating)?;

        if !RATING_RANGE.contains(&rating) {
            return Err(SubmissionError::RatingOutOfRange(rating.to_string()));
        }

        Ok(Self { display_name, rating, review_text })
    }
}

fn string_field(fields: &Map<String, Value>, name: &'static str) -> Result<String, SubmissionError> {
    match fields.get(name) {
        None => Err(SubmissionError::MissingField(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SubmissionError::NotAString(name)),
    }
}

/// The review form posts the rating as a string ("4"); API clients send a
/// number. Both are accepted, as is a float with no fractional part.
///
/// Integers too large for `i64` are still integers, so they come back as
/// out of range rather than malformed.
fn coerce_rating(value: &Value) -> Result<i64, SubmissionError> {
    let out_of_range = || SubmissionError::RatingOutOfRange(value_text(value));
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if n.is_u64() {
                return Err(out_of_range());
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                Some(f) if f.is_finite() && f.fract() == 0.0 => Err(out_of_range()),
                _ => Err(SubmissionError::RatingNotInteger),
            }
        }
        Value::String(s) => s.trim().parse().map_err(|e: ParseIntError| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
            _ => SubmissionError::RatingNotInteger,
        }),
        _ => Err(SubmissionError::RatingNotInteger),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_numeric_and_string_ratings() {
        let s = Submission::from_value(&json!({
            "displayName": "Alice", "rating": 5, "reviewText": "Great!"
        }))
        .unwrap();
        assert_eq!(s.rating, 5);

        let s = Submission::from_value(&json!({
            "displayName": "Bob", "rating": " 3 ", "reviewText": "fine"
        }))
        .unwrap();
        assert_eq!(s.rating, 3);

        let s = Submission::from_value(&json!({
            "displayName": "Cy", "rating": 4.0, "reviewText": "ok"
        }))
        .unwrap();
        assert_eq!(s.rating, 4);
    }

    #[test]
    fn rejects_non_integer_ratings() {
        for rating in [json!("abc"), json!(4.5), json!(true), json!(null), json!([5])] {
            let err = Submission::from_value(&json!({
                "displayName": "Alice", "rating": rating, "reviewText": "x"
            }))
            .unwrap_err();
            assert_eq!(err, SubmissionError::RatingNotInteger);
            assert!(!err.is_unprocessable());
        }
    }

    #[test]
    fn rejects_out_of_range_ratings() {
        for rating in [0, 6, -1] {
            let err = Submission::from_value(&json!({
                "displayName": "Alice", "rating": rating, "reviewText": "x"
            }))
            .unwrap_err();
            assert_eq!(err, SubmissionError::RatingOutOfRange(rating.to_string()));
            assert!(err.is_unprocessable());
        }
    }

    #[test]
    fn ratings_beyond_i64_are_out_of_range() {
        let huge = [
            json!(u64::MAX),
            json!(1e20),
            json!("18446744073709551615"),
            json!("-99999999999999999999"),
        ];
        for rating in huge {
            let err = Submission::from_value(&json!({
                "displayName": "Alice", "rating": rating, "reviewText": "x"
            }))
            .unwrap_err();
            assert!(err.is_unprocessable(), "{rating}: {err}");
        }

        let err = Submission::from_value(&json!({
            "displayName": "Alice", "rating": u64::MAX, "reviewText": "x"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "rating must be between 1 and 5, got 18446744073709551615");
    }

    #[test]
    fn names_the_missing_field() {
        let err = Submission::from_value(&json!({ "rating": 5, "reviewText": "x" })).unwrap_err();
        assert_eq!(err, SubmissionError::MissingField("displayName"));

        let err = Submission::from_value(&json!({ "displayName": "A", "reviewText": "x" })).unwrap_err();
        assert_eq!(err.to_string(), "missing field `rating`");

        let err = Submission::from_value(&json!({ "displayName": 7, "rating": 1, "reviewText": "x" }))
            .unwrap_err();
        assert_eq!(err, SubmissionError::NotAString("displayName"));
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert_eq!(Submission::from_slice(b"not json"), Err(SubmissionError::MalformedJson));
        assert_eq!(Submission::from_slice(b"[1, 2]"), Err(SubmissionError::NotAnObject));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let review = Review {
            display_name: "Alice".into(),
            rating: 5,
            review_text: "Great!".into(),
            timestamp: "2026-10-16T09:12:44.120391Z".into(),
        };
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["displayName"], "Alice");
        assert_eq!(value["reviewText"], "Great!");
        assert_eq!(value["rating"], 5);
    }

    #[test]
    fn stamps_rfc3339_and_reads_legacy_timestamps() {
        let now = Utc::now();
        let review = Review::new(
            Submission { display_name: "A".into(), rating: 1, review_text: "x".into() },
            now,
        );
        assert!(review.timestamp.ends_with('Z'));
        assert_eq!(review.created_at().unwrap().timestamp_micros(), now.timestamp_micros());

        let legacy = Review { timestamp: "2024-05-01T12:00:00.123456".into(), ..review.clone() };
        assert!(legacy.created_at().is_some());

        let garbage = Review { timestamp: "yesterday".into(), ..review };
        assert!(garbage.created_at().is_none());
    }
}
