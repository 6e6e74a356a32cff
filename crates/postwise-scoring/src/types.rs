use chrono::NaiveDate;
use postwise_core::Platform;
use serde::Serialize;

/// Coarse quality bucket derived from a slot's final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotTier {
    Best,
    Good,
    Fair,
}

impl SlotTier {
    /// Bucket a final score: >= 80 best, >= 60 good, else fair.
    ///
    /// Callers only construct tiers for slots that already passed the
    /// minimum-score cutoff, so "fair" covers the 40..60 band in practice.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            SlotTier::Best
        } else if score >= 60 {
            SlotTier::Good
        } else {
            SlotTier::Fair
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SlotTier::Best => "best",
            SlotTier::Good => "good",
            SlotTier::Fair => "fair",
        }
    }
}

impl std::fmt::Display for SlotTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engagement classification of a public holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HolidayKind {
    /// Marketing moment — audiences scroll more (Valentine's, Halloween, ...).
    ContentFriendly,
    /// Audiences are offline with family (Christmas Day, Thanksgiving, ...).
    Family,
    Neutral,
}

impl HolidayKind {
    /// Delta applied to a slot's score on this holiday.
    #[must_use]
    pub fn score_adjustment(self) -> i64 {
        match self {
            HolidayKind::ContentFriendly => 15,
            HolidayKind::Family => -10,
            HolidayKind::Neutral => 0,
        }
    }
}

/// A public holiday falling inside the requested date range.
#[derive(Debug, Clone, Serialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    pub kind: HolidayKind,
}

/// A scored (date, hour) candidate for scheduling a post.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredSlot {
    pub date: NaiveDate,
    /// Slot start as `"HH:00"` — slots are whole hours.
    pub time: String,
    #[serde(skip)]
    pub hour: u32,
    pub score: u32,
    /// Platforms whose peak rules matched this weekday/hour.
    pub platforms: Vec<Platform>,
    pub reason: String,
    pub tier: SlotTier,
}
