use chrono::{Datelike, Duration, NaiveDate};
use refpoints::core::period::{
    Cycle, DateRange, MonthKey, WeekBoundary, WeekRef, cycle_start, month_key, parse_day,
    parse_timestamp, week_number,
};
use refpoints::errors::AppError;

mod common;
use common::d;

const RULES: [WeekBoundary; 2] = [WeekBoundary::StartsNewWeek, WeekBoundary::ClosesPreviousWeek];

fn every_day(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |x| *x <= to)
}

#[test]
fn the_26th_starts_week_one() {
    for rule in RULES {
        for day in every_day(d(2020, 1, 1), d(2030, 12, 31)).filter(|x| x.day() == 26) {
            assert_eq!(cycle_start(day), day);
            assert_eq!(week_number(day, rule), 1, "{day}");
        }
    }
}

#[test]
fn week_number_stays_in_range_and_never_decreases_inside_a_cycle() {
    for rule in RULES {
        let mut prev: Option<(NaiveDate, u32)> = None;
        for day in every_day(d(2023, 1, 1), d(2026, 12, 31)) {
            let w = week_number(day, rule);
            assert!((1..=5).contains(&w), "{day} -> {w}");

            if let Some((p_day, p_w)) = prev
                && cycle_start(p_day) == cycle_start(day)
            {
                assert!(p_w <= w, "{p_day}={p_w} then {day}={w}");
            }
            prev = Some((day, w));
        }
    }
}

#[test]
fn cycle_rolls_back_across_the_year() {
    assert_eq!(cycle_start(d(2025, 1, 10)), d(2024, 12, 26));
    assert_eq!(cycle_start(d(2025, 1, 25)), d(2024, 12, 26));
    assert_eq!(cycle_start(d(2024, 12, 26)), d(2024, 12, 26));
    assert_eq!(cycle_start(d(2025, 3, 1)), d(2025, 2, 26));
}

#[test]
fn month_key_is_the_closing_month() {
    assert_eq!(month_key(d(2025, 3, 26)).to_string(), "04/2025");
    assert_eq!(month_key(d(2025, 4, 25)).to_string(), "04/2025");
    assert_eq!(month_key(d(2025, 12, 26)).to_string(), "01/2026");
    assert_eq!(month_key(d(2025, 1, 10)).to_string(), "01/2025");
}

#[test]
fn month_bounds_run_26_to_25() {
    let key: MonthKey = "04/2025".parse().unwrap();
    assert_eq!(key.bounds().unwrap(), DateRange::new(d(2025, 3, 26), d(2025, 4, 25)));

    let jan: MonthKey = "2026-01".parse().unwrap();
    assert_eq!(jan.bounds().unwrap(), DateRange::new(d(2025, 12, 26), d(2026, 1, 25)));

    assert!(matches!("13/2025".parse::<MonthKey>(), Err(AppError::InvalidPeriod(_))));
    assert!("april".parse::<MonthKey>().is_err());
}

#[test]
fn seventh_day_tie_break_follows_the_rule() {
    // 2025-08-26 + 7 days
    let boundary = d(2025, 9, 2);
    assert_eq!(week_number(boundary, WeekBoundary::StartsNewWeek), 2);
    assert_eq!(week_number(boundary, WeekBoundary::ClosesPreviousWeek), 1);

    for rule in RULES {
        assert_eq!(week_number(d(2025, 9, 1), rule), 1);
        assert_eq!(week_number(d(2025, 9, 3), rule), 2);
    }
}

#[test]
fn week_bounds_match_week_number_for_every_day() {
    for rule in RULES {
        for day in every_day(d(2023, 12, 1), d(2026, 3, 31)) {
            let cycle = Cycle::containing(day);
            let n = week_number(day, rule);
            for w in 1..=5 {
                let inside = cycle
                    .week_bounds(w, rule)
                    .unwrap()
                    .is_some_and(|r| r.contains(day));
                assert_eq!(inside, w == n, "{rule:?} {day} week {w}");
            }
        }
    }
}

#[test]
fn weeks_cover_the_cycle_without_gaps() {
    let cycle = Cycle::containing(d(2025, 9, 10));
    let weeks = cycle.weeks(WeekBoundary::StartsNewWeek);

    assert_eq!(weeks.len(), 5);
    assert_eq!(weeks[0].range, DateRange::new(d(2025, 8, 26), d(2025, 9, 1)));
    assert_eq!(weeks[1].range, DateRange::new(d(2025, 9, 2), d(2025, 9, 8)));
    assert_eq!(weeks[4].range, DateRange::new(d(2025, 9, 23), d(2025, 9, 25)));

    for pair in weeks.windows(2) {
        assert_eq!(pair[0].range.end + Duration::days(1), pair[1].range.start);
    }

    let legacy = cycle.weeks(WeekBoundary::ClosesPreviousWeek);
    assert_eq!(legacy[0].range, DateRange::new(d(2025, 8, 26), d(2025, 9, 2)));
    assert_eq!(legacy[1].range, DateRange::new(d(2025, 9, 3), d(2025, 9, 9)));
}

#[test]
fn short_february_cycle_has_no_fifth_week() {
    // 2025-02-26 .. 2025-03-25 is 28 days long
    let cycle = Cycle::containing(d(2025, 3, 10));
    assert_eq!(cycle.week_bounds(5, WeekBoundary::StartsNewWeek).unwrap(), None);
    assert_eq!(cycle.weeks(WeekBoundary::StartsNewWeek).len(), 4);

    assert!(matches!(
        WeekRef::new(cycle, 5, WeekBoundary::StartsNewWeek),
        Err(AppError::InvalidWeek(5))
    ));

    // leap year: the fifth week is a single day
    let leap = Cycle::containing(d(2024, 3, 10));
    assert_eq!(
        leap.week_bounds(5, WeekBoundary::StartsNewWeek).unwrap(),
        Some(DateRange::single(d(2024, 3, 25)))
    );
}

#[test]
fn week_out_of_range_is_rejected() {
    let cycle = Cycle::containing(d(2025, 9, 10));
    assert!(matches!(
        cycle.week_bounds(0, WeekBoundary::StartsNewWeek),
        Err(AppError::InvalidWeek(0))
    ));
    assert!(matches!(
        cycle.week_bounds(6, WeekBoundary::StartsNewWeek),
        Err(AppError::InvalidWeek(6))
    ));
}

#[test]
fn previous_week_rolls_into_the_last_week_of_the_previous_cycle() {
    let rule = WeekBoundary::StartsNewWeek;

    let w2 = WeekRef::containing(d(2025, 9, 5), rule);
    assert_eq!(w2.number, 2);
    assert_eq!(w2.previous(rule).number, 1);

    // week 1 of 04/2025 → week 4 of 03/2025 (short cycle)
    let w1 = WeekRef::containing(d(2025, 3, 27), rule);
    let prev = w1.previous(rule);
    assert_eq!(prev.cycle.month_key().to_string(), "03/2025");
    assert_eq!(prev.number, 4);
    assert_eq!(prev.range, DateRange::new(d(2025, 3, 19), d(2025, 3, 25)));
}

#[test]
fn timestamps_parse_in_every_accepted_format() {
    let expected = d(2025, 8, 25).and_hms_opt(11, 59, 50).unwrap();
    assert_eq!(parse_timestamp("2025-08-25 11:59:50").unwrap(), expected);
    assert_eq!(parse_timestamp("2025-08-25T11:59:50").unwrap(), expected);
    assert_eq!(
        parse_timestamp("2025-08-25 11:59").unwrap(),
        d(2025, 8, 25).and_hms_opt(11, 59, 0).unwrap()
    );
    assert_eq!(
        parse_timestamp("2025-08-25").unwrap(),
        d(2025, 8, 25).and_hms_opt(0, 0, 0).unwrap()
    );
    assert_eq!(parse_day(" 2025-08-25 11:59:50 ").unwrap(), d(2025, 8, 25));
}

#[test]
fn unparseable_dates_are_errors_not_week_one() {
    for bad in ["", "25/08/2025", "2025-02-30", "yesterday"] {
        assert!(
            matches!(parse_timestamp(bad), Err(AppError::InvalidDate(_))),
            "{bad:?}"
        );
    }
}
