//! Upstream sources.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | YouTube Data API v3 | [`youtube`] | JSON API | Requires an API key; quota errors are not retried |
//! | News aggregator | [`aggregator`] | HTML scraping | Selectors and site labels come from [`NewsConfig`](crate::config::NewsConfig) |
//!
//! Both go through the shared [`Fetcher`](crate::fetcher::Fetcher), so every
//! request gets the same timeout and retry policy. A failed fetch is logged
//! and yields an empty result; nothing here aborts a run.

pub mod aggregator;
pub mod youtube;
