//! jobdates — date normalization shared by the jobharvest vendor scrapers.
//!
//! Every careers site reports posting dates differently. This crate folds
//! relative phrases ("Posted Today", "3 days ago"), ISO/RFC timestamps,
//! epoch integers, and human-readable dates into one canonical UTC form
//! (`YYYY-MM-DDTHH:MM:SSZ`) and stamps each scraped record with when it was
//! harvested. Fetching, HTML parsing, and file output live in the individual
//! scrapers; nothing here does I/O beyond reading the clock.

pub mod date_utils;
pub mod records;

pub use date_utils::{
    current_utc_timestamp, format_canonical, normalize_date_to_utc, CANONICAL_FORMAT,
};
pub use records::{
    annotate_with_scrape_metadata, annotate_with_scrape_metadata_at, sort_by_posted_date,
    JobRecord, POSTED_DATE, POSTED_DATE_ORIGINAL, SCRAPED_AT,
};
