//! Posting-slot scoring engine.
//!
//! Pure computation over request-local data: a publish-history histogram,
//! the static platform peak-hour table, a holiday map, and the set of
//! already-scheduled slots. All I/O (post history, schedule, channel
//! lookup) lives in `postwise-db`; this crate never touches the database,
//! which keeps the scoring rules unit-testable.

mod country;
mod engine;
mod histogram;
mod holidays;
mod peaks;
mod types;

pub use country::country_for_timezone;
pub use engine::{
    compute_slots, ScoringInputs, HISTORY_SAMPLE_LIMIT, MIN_HOUR_GAP, MIN_PUBLISHED_POSTS,
    MIN_SLOT_SCORE, SLOTS_PER_DAY, SLOT_END_HOUR, SLOT_START_HOUR,
};
pub use histogram::PostHistogram;
pub use holidays::{classify_holiday, holidays_in_range};
pub use peaks::{peak_score, PeakRule, PEAK_RULES};
pub use types::{Holiday, HolidayKind, ScoredSlot, SlotTier};
