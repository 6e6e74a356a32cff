//! Built-in public-holiday calendar and engagement classification.
//!
//! Countries without a table here degrade to an empty holiday list — a
//! missing calendar never fails a request, it just means no score deltas.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::types::{Holiday, HolidayKind};

#[derive(Debug, Clone, Copy)]
enum DateRule {
    Fixed { month: u32, day: u32 },
    NthWeekday { month: u32, weekday: Weekday, nth: u8 },
    LastWeekday { month: u32, weekday: Weekday },
    /// Day after the nth weekday of a month (Black Friday).
    DayAfterNthWeekday { month: u32, weekday: Weekday, nth: u8 },
}

#[derive(Debug, Clone, Copy)]
struct HolidayDef {
    name: &'static str,
    rule: DateRule,
}

const fn fixed(name: &'static str, month: u32, day: u32) -> HolidayDef {
    HolidayDef {
        name,
        rule: DateRule::Fixed { month, day },
    }
}

/// Observed in every supported country.
const COMMON: &[HolidayDef] = &[
    fixed("New Year's Day", 1, 1),
    fixed("Valentine's Day", 2, 14),
    fixed("Halloween", 10, 31),
    fixed("Christmas Eve", 12, 24),
    fixed("Christmas Day", 12, 25),
    fixed("New Year's Eve", 12, 31),
];

const US: &[HolidayDef] = &[
    HolidayDef {
        name: "Mother's Day",
        rule: DateRule::NthWeekday {
            month: 5,
            weekday: Weekday::Sun,
            nth: 2,
        },
    },
    HolidayDef {
        name: "Memorial Day",
        rule: DateRule::LastWeekday {
            month: 5,
            weekday: Weekday::Mon,
        },
    },
    HolidayDef {
        name: "Father's Day",
        rule: DateRule::NthWeekday {
            month: 6,
            weekday: Weekday::Sun,
            nth: 3,
        },
    },
    fixed("Independence Day", 7, 4),
    HolidayDef {
        name: "Labor Day",
        rule: DateRule::NthWeekday {
            month: 9,
            weekday: Weekday::Mon,
            nth: 1,
        },
    },
    HolidayDef {
        name: "Thanksgiving",
        rule: DateRule::NthWeekday {
            month: 11,
            weekday: Weekday::Thu,
            nth: 4,
        },
    },
    HolidayDef {
        name: "Black Friday",
        rule: DateRule::DayAfterNthWeekday {
            month: 11,
            weekday: Weekday::Thu,
            nth: 4,
        },
    },
];

const CA: &[HolidayDef] = &[
    fixed("Canada Day", 7, 1),
    HolidayDef {
        name: "Thanksgiving",
        rule: DateRule::NthWeekday {
            month: 10,
            weekday: Weekday::Mon,
            nth: 2,
        },
    },
    fixed("Boxing Day", 12, 26),
];

const GB: &[HolidayDef] = &[
    HolidayDef {
        name: "Early May Bank Holiday",
        rule: DateRule::NthWeekday {
            month: 5,
            weekday: Weekday::Mon,
            nth: 1,
        },
    },
    fixed("Guy Fawkes Night", 11, 5),
    fixed("Boxing Day", 12, 26),
];

const AU: &[HolidayDef] = &[
    fixed("Australia Day", 1, 26),
    fixed("Anzac Day", 4, 25),
    fixed("Boxing Day", 12, 26),
];

const DE: &[HolidayDef] = &[
    fixed("Labour Day", 5, 1),
    fixed("German Unity Day", 10, 3),
    fixed("Second Christmas Day", 12, 26),
];

const FR: &[HolidayDef] = &[
    fixed("Labour Day", 5, 1),
    fixed("Bastille Day", 7, 14),
    fixed("Armistice Day", 11, 11),
];

fn country_defs(country: &str) -> Option<&'static [HolidayDef]> {
    match country {
        "US" => Some(US),
        "CA" => Some(CA),
        "GB" => Some(GB),
        "AU" => Some(AU),
        "DE" => Some(DE),
        "FR" => Some(FR),
        _ => None,
    }
}

fn resolve(def: &HolidayDef, year: i32) -> Option<NaiveDate> {
    match def.rule {
        DateRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
        DateRule::NthWeekday {
            month,
            weekday,
            nth,
        } => NaiveDate::from_weekday_of_month_opt(year, month, weekday, nth),
        DateRule::LastWeekday { month, weekday } => {
            NaiveDate::from_weekday_of_month_opt(year, month, weekday, 5)
                .or_else(|| NaiveDate::from_weekday_of_month_opt(year, month, weekday, 4))
        }
        DateRule::DayAfterNthWeekday {
            month,
            weekday,
            nth,
        } => NaiveDate::from_weekday_of_month_opt(year, month, weekday, nth)
            .and_then(|d| d.succ_opt()),
    }
}

/// Classify a holiday name by keyword.
///
/// Content-friendly holidays are marketing moments that boost engagement;
/// family holidays pull audiences offline. Anything unrecognised is neutral.
#[must_use]
pub fn classify_holiday(name: &str) -> HolidayKind {
    const CONTENT_FRIENDLY: &[&str] = &[
        "valentine",
        "halloween",
        "black friday",
        "mother's",
        "father's",
        "boxing",
        "new year's eve",
    ];
    const FAMILY: &[&str] = &["christmas", "thanksgiving", "easter"];

    let lower = name.to_lowercase();
    if CONTENT_FRIENDLY.iter().any(|kw| lower.contains(kw)) {
        HolidayKind::ContentFriendly
    } else if FAMILY.iter().any(|kw| lower.contains(kw)) {
        HolidayKind::Family
    } else {
        HolidayKind::Neutral
    }
}

/// All holidays for `country` with dates inside `[from, to]`, sorted by date.
///
/// Unsupported countries return an empty list.
#[must_use]
pub fn holidays_in_range(country: &str, from: NaiveDate, to: NaiveDate) -> Vec<Holiday> {
    let Some(defs) = country_defs(country) else {
        return Vec::new();
    };

    let mut holidays = Vec::new();
    for year in from.year()..=to.year() {
        for def in COMMON.iter().chain(defs) {
            if let Some(date) = resolve(def, year) {
                if date >= from && date <= to {
                    holidays.push(Holiday {
                        date,
                        name: def.name.to_string(),
                        kind: classify_holiday(def.name),
                    });
                }
            }
        }
    }
    holidays.sort_by_key(|h| h.date);
    holidays
}
