//! Static per-platform peak engagement rules.

use postwise_core::Platform;

/// A peak-hour rule: on the given weekdays and hours, this platform's
/// audience engagement is worth `score` (out of 100).
///
/// Weekdays use 0 = Sunday through 6 = Saturday, matching the histogram.
#[derive(Debug, Clone, Copy)]
pub struct PeakRule {
    pub platform: Platform,
    pub days: &'static [u32],
    pub hours: &'static [u32],
    pub score: u32,
}

const WEEKDAYS: &[u32] = &[1, 2, 3, 4, 5];
const MIDWEEK: &[u32] = &[2, 3, 4];
const WEEKEND: &[u32] = &[0, 6];

/// Read-only engagement configuration. Scores are relative strengths per
/// platform, not comparable absolute metrics.
pub const PEAK_RULES: &[PeakRule] = &[
    PeakRule {
        platform: Platform::Facebook,
        days: MIDWEEK,
        hours: &[11, 12],
        score: 100,
    },
    PeakRule {
        platform: Platform::Facebook,
        days: WEEKDAYS,
        hours: &[9, 10],
        score: 80,
    },
    PeakRule {
        platform: Platform::Facebook,
        days: WEEKEND,
        hours: &[12, 13],
        score: 70,
    },
    PeakRule {
        platform: Platform::Instagram,
        days: WEEKDAYS,
        hours: &[11, 12, 13],
        score: 95,
    },
    PeakRule {
        platform: Platform::Instagram,
        days: &[2, 3],
        hours: &[19, 20],
        score: 85,
    },
    PeakRule {
        platform: Platform::Instagram,
        days: WEEKEND,
        hours: &[10, 11],
        score: 75,
    },
    PeakRule {
        platform: Platform::Tiktok,
        days: MIDWEEK,
        hours: &[18, 19, 20, 21],
        score: 100,
    },
    PeakRule {
        platform: Platform::Tiktok,
        days: WEEKDAYS,
        hours: &[12, 13],
        score: 80,
    },
    PeakRule {
        platform: Platform::Youtube,
        days: &[4, 5, 6],
        hours: &[15, 16, 17],
        score: 95,
    },
    PeakRule {
        platform: Platform::Youtube,
        days: &[0],
        hours: &[10, 11],
        score: 80,
    },
    PeakRule {
        platform: Platform::Linkedin,
        days: MIDWEEK,
        hours: &[8, 9, 10],
        score: 100,
    },
    PeakRule {
        platform: Platform::Linkedin,
        days: &[2, 3],
        hours: &[12],
        score: 85,
    },
    PeakRule {
        platform: Platform::Pinterest,
        days: WEEKEND,
        hours: &[20, 21],
        score: 95,
    },
    PeakRule {
        platform: Platform::Pinterest,
        days: WEEKDAYS,
        hours: &[15, 16],
        score: 75,
    },
    PeakRule {
        platform: Platform::Gbp,
        days: WEEKDAYS,
        hours: &[9, 10, 11],
        score: 85,
    },
    PeakRule {
        platform: Platform::Bluesky,
        days: WEEKDAYS,
        hours: &[9, 10],
        score: 80,
    },
    PeakRule {
        platform: Platform::Bluesky,
        days: MIDWEEK,
        hours: &[20, 21],
        score: 75,
    },
];

/// Best matching rule score for a platform at (day-of-week, hour).
///
/// Returns 0 when no rule matches.
#[must_use]
pub fn peak_score(platform: Platform, dow: u32, hour: u32) -> u32 {
    PEAK_RULES
        .iter()
        .filter(|rule| {
            rule.platform == platform && rule.days.contains(&dow) && rule.hours.contains(&hour)
        })
        .map(|rule| rule.score)
        .max()
        .unwrap_or(0)
}
