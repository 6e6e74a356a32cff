//! Slot scoring and selection.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use postwise_core::Platform;

use crate::histogram::PostHistogram;
use crate::peaks::peak_score;
use crate::types::{Holiday, ScoredSlot, SlotTier};

/// Channels need this many published posts before recommendations are made.
pub const MIN_PUBLISHED_POSTS: i64 = 20;
/// Histogram sample size: the N most recent published posts.
pub const HISTORY_SAMPLE_LIMIT: i64 = 200;
/// Candidate hours run 07:00 through 21:00 inclusive.
pub const SLOT_START_HOUR: u32 = 7;
pub const SLOT_END_HOUR: u32 = 21;
/// Slots scoring below this are not worth surfacing.
pub const MIN_SLOT_SCORE: u32 = 40;
/// At most this many slots are kept per calendar day.
pub const SLOTS_PER_DAY: usize = 3;
/// Selected slots on one day must be at least this many hours apart.
pub const MIN_HOUR_GAP: u32 = 2;

const HISTORY_WEIGHT: f64 = 0.7;
const PLATFORM_WEIGHT: f64 = 0.3;
const OPEN_DAY_BONUS: i64 = 10;

/// Request-local inputs to [`compute_slots`]. All data access happens
/// before the engine runs; the engine itself is pure.
#[derive(Debug)]
pub struct ScoringInputs<'a> {
    pub histogram: &'a PostHistogram,
    /// Platforms to consider — the caller substitutes the channel's full
    /// platform set when the request names none.
    pub platforms: &'a [Platform],
    pub holidays: &'a HashMap<NaiveDate, Holiday>,
    /// (channel-local date, hour) pairs already taken by scheduled posts.
    pub scheduled: &'a HashSet<(NaiveDate, u32)>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Produce the ranked slot list for the requested range.
///
/// Per day: score every free hour with a history signal, drop weak slots,
/// keep the top [`SLOTS_PER_DAY`], then greedily enforce the
/// [`MIN_HOUR_GAP`] separation in descending score order. Output is
/// ordered by date then hour.
#[must_use]
pub fn compute_slots(inputs: &ScoringInputs<'_>) -> Vec<ScoredSlot> {
    let scheduled_days: HashSet<NaiveDate> =
        inputs.scheduled.iter().map(|(date, _)| *date).collect();

    let mut selected = Vec::new();
    let mut date = inputs.from;
    while date <= inputs.to {
        let mut day_slots = score_day(inputs, date, !scheduled_days.contains(&date));

        // Stable sort: ties keep chronological insertion order.
        day_slots.sort_by(|a, b| b.score.cmp(&a.score));
        day_slots.truncate(SLOTS_PER_DAY);

        let mut accepted: Vec<ScoredSlot> = Vec::new();
        for slot in day_slots {
            if accepted
                .iter()
                .all(|kept| kept.hour.abs_diff(slot.hour) >= MIN_HOUR_GAP)
            {
                accepted.push(slot);
            }
        }
        accepted.sort_by_key(|slot| slot.hour);
        selected.extend(accepted);

        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    selected
}

fn score_day(inputs: &ScoringInputs<'_>, date: NaiveDate, day_is_open: bool) -> Vec<ScoredSlot> {
    let dow = date.weekday().num_days_from_sunday();
    let holiday = inputs.holidays.get(&date);

    let mut slots = Vec::new();
    for hour in SLOT_START_HOUR..=SLOT_END_HOUR {
        if inputs.scheduled.contains(&(date, hour)) {
            continue;
        }

        let hist_count = inputs.histogram.count(dow, hour);
        if hist_count == 0 {
            // No historical signal for this bucket at all.
            continue;
        }
        let history_score = inputs.histogram.history_score(dow, hour);

        let mut matched: Vec<Platform> = Vec::new();
        let mut platform_score: u32 = 0;
        for &platform in inputs.platforms {
            let score = peak_score(platform, dow, hour);
            if score > 0 {
                matched.push(platform);
                platform_score = platform_score.max(score);
            }
        }

        let base = weighted_base(history_score, platform_score);
        let mut score = base;
        if let Some(holiday) = holiday {
            score += holiday.kind.score_adjustment();
        }
        if day_is_open {
            score += OPEN_DAY_BONUS;
        }
        let score = clamp_score(score);
        if score < MIN_SLOT_SCORE {
            continue;
        }

        slots.push(ScoredSlot {
            date,
            time: format!("{hour:02}:00"),
            hour,
            score,
            reason: build_reason(hist_count, &matched, holiday, day_is_open),
            platforms: matched,
            tier: SlotTier::from_score(score),
        });
    }
    slots
}

fn weighted_base(history_score: u32, platform_score: u32) -> i64 {
    let weighted =
        f64::from(history_score) * HISTORY_WEIGHT + f64::from(platform_score) * PLATFORM_WEIGHT;
    #[allow(clippy::cast_possible_truncation)]
    {
        weighted.round() as i64
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(score: i64) -> u32 {
    score.clamp(0, 100) as u32
}

fn build_reason(
    hist_count: u32,
    matched: &[Platform],
    holiday: Option<&Holiday>,
    day_is_open: bool,
) -> String {
    let mut parts = vec![if hist_count == 1 {
        "1 past post at this hour".to_string()
    } else {
        format!("{hist_count} past posts at this hour")
    }];

    if !matched.is_empty() {
        let names: Vec<&str> = matched.iter().map(|p| p.as_str()).collect();
        parts.push(format!("peak hour for {}", names.join(", ")));
    }

    if let Some(holiday) = holiday {
        match holiday.kind {
            crate::types::HolidayKind::ContentFriendly => {
                parts.push(format!("{} boost", holiday.name));
            }
            crate::types::HolidayKind::Family => {
                parts.push(format!("{} — audiences may be offline", holiday.name));
            }
            crate::types::HolidayKind::Neutral => {}
        }
    }

    if day_is_open {
        parts.push("nothing scheduled this day".to_string());
    }

    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HolidayKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-03-05 is a Wednesday (dow 3).
    const WED: (i32, u32, u32) = (2025, 3, 5);

    struct Fixture {
        histogram: PostHistogram,
        platforms: Vec<Platform>,
        holidays: HashMap<NaiveDate, Holiday>,
        scheduled: HashSet<(NaiveDate, u32)>,
        from: NaiveDate,
        to: NaiveDate,
    }

    impl Fixture {
        fn single_wednesday(histogram: PostHistogram) -> Self {
            Self {
                histogram,
                platforms: vec![Platform::Facebook],
                holidays: HashMap::new(),
                scheduled: HashSet::new(),
                from: date(WED.0, WED.1, WED.2),
                to: date(WED.0, WED.1, WED.2),
            }
        }

        fn inputs(&self) -> ScoringInputs<'_> {
            ScoringInputs {
                histogram: &self.histogram,
                platforms: &self.platforms,
                holidays: &self.holidays,
                scheduled: &self.scheduled,
                from: self.from,
                to: self.to,
            }
        }
    }

    #[test]
    fn twenty_posts_at_wednesday_eleven_yields_perfect_slot() {
        // Histogram max at (3, 11) + the facebook midweek 11-12 peak rule.
        let fixture = Fixture::single_wednesday(PostHistogram::from_buckets(vec![(3, 11); 20]));
        let slots = compute_slots(&fixture.inputs());

        assert_eq!(slots.len(), 1);
        let slot = &slots[0];
        assert_eq!(slot.date, date(WED.0, WED.1, WED.2));
        assert_eq!(slot.hour, 11);
        assert_eq!(slot.time, "11:00");
        assert_eq!(slot.score, 100);
        assert_eq!(slot.tier, SlotTier::Best);
        assert_eq!(slot.platforms, vec![Platform::Facebook]);
    }

    #[test]
    fn history_outside_range_weekdays_yields_no_slots() {
        // All history on Wednesdays, but the range covers Thursday-Friday.
        let fixture = Fixture {
            from: date(2025, 3, 6),
            to: date(2025, 3, 7),
            ..Fixture::single_wednesday(PostHistogram::from_buckets(vec![(3, 11); 30]))
        };
        assert!(compute_slots(&fixture.inputs()).is_empty());
    }

    #[test]
    fn scores_stay_within_bounds_and_tiers_match() {
        let mut buckets = Vec::new();
        for hour in 7..=21 {
            for _ in 0..(hour % 5 + 1) {
                buckets.push((3, hour));
            }
        }
        let mut fixture = Fixture::single_wednesday(PostHistogram::from_buckets(buckets));
        fixture.platforms = Platform::ALL.to_vec();
        let slots = compute_slots(&fixture.inputs());

        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(slot.score <= 100, "score {} out of bounds", slot.score);
            assert!(slot.score >= MIN_SLOT_SCORE);
            let expected = SlotTier::from_score(slot.score);
            assert_eq!(slot.tier, expected);
        }
    }

    #[test]
    fn per_day_slots_respect_two_hour_gap() {
        // Adjacent strong hours 10, 11, 12: 11 must lose to its neighbours.
        let mut buckets = vec![(3, 10); 5];
        buckets.extend(vec![(3, 11); 4]);
        buckets.extend(vec![(3, 12); 3]);
        let fixture = Fixture::single_wednesday(PostHistogram::from_buckets(buckets));
        let slots = compute_slots(&fixture.inputs());

        let hours: Vec<u32> = slots.iter().map(|s| s.hour).collect();
        assert_eq!(hours, vec![10, 12]);
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert!(
                    a.hour.abs_diff(b.hour) >= MIN_HOUR_GAP,
                    "slots {} and {} violate the gap",
                    a.hour,
                    b.hour
                );
            }
        }
    }

    #[test]
    fn at_most_three_slots_per_day() {
        let mut buckets = Vec::new();
        for hour in [7, 9, 11, 13, 15, 17, 19, 21] {
            buckets.extend(vec![(3, hour); 10]);
        }
        let fixture = Fixture::single_wednesday(PostHistogram::from_buckets(buckets));
        let slots = compute_slots(&fixture.inputs());
        assert!(slots.len() <= SLOTS_PER_DAY);
    }

    #[test]
    fn scheduled_hours_are_never_recommended() {
        let mut fixture = Fixture::single_wednesday(PostHistogram::from_buckets(vec![(3, 11); 20]));
        fixture
            .scheduled
            .insert((date(WED.0, WED.1, WED.2), 11_u32));
        let slots = compute_slots(&fixture.inputs());
        assert!(
            slots.iter().all(|s| s.hour != 11),
            "occupied hour must be skipped"
        );
    }

    #[test]
    fn open_day_bonus_applies_only_without_schedule() {
        let histogram = PostHistogram::from_buckets({
            let mut b = vec![(3, 11); 10];
            b.extend(vec![(3, 15); 10]);
            b
        });
        let open = Fixture::single_wednesday(histogram.clone());
        let open_slot_score = compute_slots(&open.inputs())
            .iter()
            .find(|s| s.hour == 15)
            .map(|s| s.score)
            .expect("open-day slot at 15:00");

        let mut busy = Fixture::single_wednesday(histogram);
        // Occupy an unrelated evening hour so the day is no longer open.
        busy.scheduled.insert((date(WED.0, WED.1, WED.2), 20_u32));
        let busy_slot_score = compute_slots(&busy.inputs())
            .iter()
            .find(|s| s.hour == 15)
            .map(|s| s.score)
            .expect("busy-day slot at 15:00");

        assert_eq!(open_slot_score, busy_slot_score + 10);
    }

    #[test]
    fn content_friendly_holiday_boosts_and_family_penalises() {
        let histogram = PostHistogram::from_buckets({
            let mut b = vec![(3, 11); 10];
            b.extend(vec![(3, 15); 8]);
            b
        });

        let plain = Fixture::single_wednesday(histogram.clone());
        let plain_score = compute_slots(&plain.inputs())
            .iter()
            .find(|s| s.hour == 15)
            .map(|s| s.score)
            .expect("baseline slot");

        let mut boosted = Fixture::single_wednesday(histogram.clone());
        boosted.holidays.insert(
            date(WED.0, WED.1, WED.2),
            Holiday {
                date: date(WED.0, WED.1, WED.2),
                name: "Halloween".to_string(),
                kind: HolidayKind::ContentFriendly,
            },
        );
        let boosted_score = compute_slots(&boosted.inputs())
            .iter()
            .find(|s| s.hour == 15)
            .map(|s| s.score)
            .expect("boosted slot");
        assert_eq!(boosted_score, plain_score + 15);

        let mut penalised = Fixture::single_wednesday(histogram);
        penalised.holidays.insert(
            date(WED.0, WED.1, WED.2),
            Holiday {
                date: date(WED.0, WED.1, WED.2),
                name: "Christmas Day".to_string(),
                kind: HolidayKind::Family,
            },
        );
        let penalised_score = compute_slots(&penalised.inputs())
            .iter()
            .find(|s| s.hour == 15)
            .map(|s| s.score)
            .expect("penalised slot");
        assert_eq!(penalised_score, plain_score - 10);
    }

    #[test]
    fn weak_slots_below_cutoff_are_dropped() {
        // One dominant bucket and one tiny one: the tiny bucket's history
        // score (round(1/20*100) = 5) produces a sub-cutoff total.
        let mut buckets = vec![(3, 11); 20];
        buckets.push((3, 15));
        let fixture = Fixture::single_wednesday(PostHistogram::from_buckets(buckets));
        let slots = compute_slots(&fixture.inputs());
        assert!(slots.iter().all(|s| s.hour != 15));
    }

    #[test]
    fn multi_platform_slot_lists_all_matches_and_takes_max_score() {
        // Wednesday 09:00 matches facebook (80), linkedin (100), gbp (85),
        // bluesky (80). Max platform score is linkedin's 100.
        let mut fixture = Fixture::single_wednesday(PostHistogram::from_buckets(vec![(3, 9); 20]));
        fixture.platforms = vec![
            Platform::Facebook,
            Platform::Linkedin,
            Platform::Gbp,
            Platform::Bluesky,
        ];
        let slots = compute_slots(&fixture.inputs());
        assert_eq!(slots.len(), 1);
        let slot = &slots[0];
        assert_eq!(
            slot.platforms,
            vec![
                Platform::Facebook,
                Platform::Linkedin,
                Platform::Gbp,
                Platform::Bluesky
            ]
        );
        // history 100 * 0.7 + 100 * 0.3 + open-day 10, clamped.
        assert_eq!(slot.score, 100);
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let mut buckets = vec![(3, 9); 7];
        buckets.extend(vec![(3, 13); 9]);
        buckets.extend(vec![(3, 18); 4]);
        let fixture = Fixture::single_wednesday(PostHistogram::from_buckets(buckets));

        let first = compute_slots(&fixture.inputs());
        let second = compute_slots(&fixture.inputs());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!((a.date, a.hour, a.score), (b.date, b.hour, b.score));
            assert_eq!(a.reason, b.reason);
        }
    }

    #[test]
    fn reason_mentions_history_platforms_and_open_day() {
        let fixture = Fixture::single_wednesday(PostHistogram::from_buckets(vec![(3, 11); 20]));
        let slots = compute_slots(&fixture.inputs());
        let reason = &slots[0].reason;
        assert!(reason.contains("20 past posts"), "reason was: {reason}");
        assert!(reason.contains("facebook"), "reason was: {reason}");
        assert!(
            reason.contains("nothing scheduled"),
            "reason was: {reason}"
        );
    }

    #[test]
    fn multi_day_range_orders_by_date_then_hour() {
        // History on Wednesday and Thursday buckets.
        let mut buckets = vec![(3, 11); 10];
        buckets.extend(vec![(4, 9); 10]);
        buckets.extend(vec![(3, 19); 6]);
        let fixture = Fixture {
            from: date(2025, 3, 5),
            to: date(2025, 3, 6),
            platforms: Platform::ALL.to_vec(),
            ..Fixture::single_wednesday(PostHistogram::from_buckets(buckets))
        };
        let slots = compute_slots(&fixture.inputs());
        let keys: Vec<(NaiveDate, u32)> = slots.iter().map(|s| (s.date, s.hour)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(slots.iter().any(|s| s.date == date(2025, 3, 6)));
    }
}
