#![forbid(unsafe_code)]

//! Submission timestamps.

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Human-readable stamp, e.g. `October 19, 2026 at 14:05 UTC`.
const HUMAN_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year] at [hour]:[minute] UTC");

/// Source of the timestamp attached to each submission.
pub trait SubmissionClock {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock. Uses `web_time` so it also works on `wasm32-unknown-unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SubmissionClock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        let since_epoch = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .unwrap_or_default();
        let nanos = i128::try_from(since_epoch.as_nanos()).unwrap_or(0);
        OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl SubmissionClock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Format `at` for the relay payload.
pub fn format_human(at: OffsetDateTime) -> String {
    let utc = at.to_offset(time::UtcOffset::UTC);
    utc.format(HUMAN_FORMAT)
        .unwrap_or_else(|_| utc.unix_timestamp().to_string())
}
