// src/records.rs
//
// Scrape-metadata stamping for job records. A record is whatever field map a
// vendor scraper produced; this module only touches the posting-date and
// scrape-timestamp fields and passes everything else through.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::date_utils::{format_canonical, normalize_date_to_utc};

/// One job posting as an open-ended field map, owned by the vendor scrapers.
pub type JobRecord = Map<String, Value>;

/// Posting timestamp field; canonical UTC after annotation.
pub const POSTED_DATE: &str = "Posted Date";
/// The posting date exactly as scraped, kept for reference.
pub const POSTED_DATE_ORIGINAL: &str = "Posted Date Original";
/// When the record was harvested.
pub const SCRAPED_AT: &str = "Scraped At";

/// Stamp a record with scrape metadata using the real clock.
///
/// Scrapers call this once per extracted record before persisting it.
pub fn annotate_with_scrape_metadata(record: JobRecord) -> JobRecord {
    annotate_with_scrape_metadata_at(record, Utc::now())
}

/// Clock-explicit variant of [`annotate_with_scrape_metadata`].
///
/// Sets `"Scraped At"` to `now`. If the record carries a `"Posted Date"`
/// string, normalizes it in place and preserves the raw value under
/// `"Posted Date Original"`. Blank or non-string posting dates are left
/// untouched, but the original field is still added so every record ends up
/// with the same schema. No other field is modified.
pub fn annotate_with_scrape_metadata_at(mut record: JobRecord, now: DateTime<Utc>) -> JobRecord {
    record.insert(SCRAPED_AT.to_string(), Value::String(format_canonical(now)));

    let Some(original) = record.get(POSTED_DATE).cloned() else {
        return record;
    };

    if let Value::String(raw) = &original {
        if !raw.trim().is_empty() {
            let normalized = normalize_date_to_utc(raw, now);
            record.insert(POSTED_DATE.to_string(), Value::String(normalized));
        }
    }
    record.insert(POSTED_DATE_ORIGINAL.to_string(), original);

    record
}

/// Sort records most-recent-first by normalized posting date.
///
/// Canonical timestamps are fixed-width, so lexicographic order is
/// chronological order. Records without a usable posting date sort last;
/// ties keep their scrape order.
pub fn sort_by_posted_date(jobs: &mut [JobRecord]) {
    jobs.sort_by(|a, b| posted_key(b).cmp(posted_key(a)));
}

fn posted_key(record: &JobRecord) -> &str {
    record
        .get(POSTED_DATE)
        .and_then(Value::as_str)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 29, 0, 0, 0).unwrap()
    }

    fn record(value: Value) -> JobRecord {
        value.as_object().expect("test record must be an object").clone()
    }

    #[test]
    fn test_annotate_normalizes_posted_date() {
        let annotated = annotate_with_scrape_metadata_at(
            record(json!({"Posted Date": "Posted 2 Days Ago"})),
            anchor(),
        );

        assert_eq!(annotated[POSTED_DATE], json!("2025-06-27T00:00:00Z"));
        assert_eq!(annotated[POSTED_DATE_ORIGINAL], json!("Posted 2 Days Ago"));
        assert_eq!(annotated[SCRAPED_AT], json!("2025-06-29T00:00:00Z"));
    }

    #[test]
    fn test_annotate_keeps_empty_posted_date() {
        let annotated =
            annotate_with_scrape_metadata_at(record(json!({"Posted Date": ""})), anchor());

        assert_eq!(annotated[POSTED_DATE], json!(""));
        assert_eq!(annotated[POSTED_DATE_ORIGINAL], json!(""));
        assert_eq!(annotated[SCRAPED_AT], json!("2025-06-29T00:00:00Z"));
    }

    #[test]
    fn test_annotate_without_posted_date_only_stamps() {
        let annotated =
            annotate_with_scrape_metadata_at(record(json!({"Title": "Engineer"})), anchor());

        assert_eq!(annotated[SCRAPED_AT], json!("2025-06-29T00:00:00Z"));
        assert!(!annotated.contains_key(POSTED_DATE));
        assert!(!annotated.contains_key(POSTED_DATE_ORIGINAL));
    }

    #[test]
    fn test_annotate_leaves_non_string_posted_date_alone() {
        let annotated = annotate_with_scrape_metadata_at(
            record(json!({"Posted Date": null})),
            anchor(),
        );

        assert_eq!(annotated[POSTED_DATE], Value::Null);
        assert_eq!(annotated[POSTED_DATE_ORIGINAL], Value::Null);
    }

    #[test]
    fn test_annotate_passes_other_fields_through() {
        let annotated = annotate_with_scrape_metadata_at(
            record(json!({
                "Title": "Machine Learning Engineer",
                "Location": ["Austin, TX", "Remote"],
                "Posted Date": "Posted Today",
            })),
            anchor(),
        );

        assert_eq!(annotated["Title"], json!("Machine Learning Engineer"));
        assert_eq!(annotated["Location"], json!(["Austin, TX", "Remote"]));
        assert_eq!(annotated.len(), 5);
    }

    #[test]
    fn test_unparseable_posted_date_becomes_empty() {
        let annotated = annotate_with_scrape_metadata_at(
            record(json!({"Posted Date": "call for details"})),
            anchor(),
        );

        assert_eq!(annotated[POSTED_DATE], json!(""));
        assert_eq!(annotated[POSTED_DATE_ORIGINAL], json!("call for details"));
    }

    #[test]
    fn test_annotate_twice_is_stable_apart_from_scraped_at() {
        let once = annotate_with_scrape_metadata_at(
            record(json!({"Posted Date": "Posted 2 Days Ago"})),
            anchor(),
        );
        let later = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
        let twice = annotate_with_scrape_metadata_at(once.clone(), later);

        // The canonical value round-trips through normalization unchanged.
        assert_eq!(twice[POSTED_DATE], once[POSTED_DATE]);
        assert_eq!(twice[SCRAPED_AT], json!("2025-06-30T12:00:00Z"));
    }

    #[test]
    fn test_sort_by_posted_date_most_recent_first() {
        let mut jobs: Vec<JobRecord> = vec![
            record(json!({"Title": "a", "Posted Date": "2025-06-01T00:00:00Z"})),
            record(json!({"Title": "b", "Posted Date": ""})),
            record(json!({"Title": "c", "Posted Date": "2025-06-27T00:00:00Z"})),
            record(json!({"Title": "d"})),
            record(json!({"Title": "e", "Posted Date": "2025-06-15T08:30:00Z"})),
        ];

        sort_by_posted_date(&mut jobs);

        let titles: Vec<&str> = jobs.iter().map(|j| j["Title"].as_str().unwrap()).collect();
        assert_eq!(titles, ["c", "e", "a", "b", "d"]);
    }
}
