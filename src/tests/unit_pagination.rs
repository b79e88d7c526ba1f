use crate::domain::DayGroup;
use crate::services::posts::{filter_days, limit_days, paginate_days, DayFilter};
use crate::tests::stub_day;

fn counts(days: &[DayGroup]) -> Vec<usize> {
    days.iter().map(DayGroup::len).collect()
}

// newest first: 2, 3, 4 articles
fn three_days() -> Vec<DayGroup> {
    vec![
        stub_day((2014, 3, 19), 2),
        stub_day((2014, 3, 18), 3),
        stub_day((2014, 3, 17), 4),
    ]
}

#[test]
fn test_paginate_never_splits_a_day() {
    let days = vec![
        stub_day((2014, 3, 20), 4),
        stub_day((2014, 3, 19), 4),
        stub_day((2014, 3, 18), 12),
        stub_day((2014, 3, 17), 1),
        stub_day((2014, 3, 16), 2),
    ];

    let pages = paginate_days(&days, 5);

    // 4+4 reaches 5, the 12-article day is a page on its own, the rest trails
    assert_eq!(pages.len(), 3);
    assert_eq!(pages.iter().map(|p| p.number).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(pages[0].article_count(), 8);
    assert_eq!(pages[1].article_count(), 12);
    assert_eq!(pages[2].article_count(), 3);
}

#[test]
fn test_paginate_concatenation_reproduces_input() {
    let days = three_days();
    let pages = paginate_days(&days, 4);

    let rejoined: Vec<_> = pages.iter().flat_map(|p| p.days.iter()).map(|d| d.date).collect();
    let original: Vec<_> = days.iter().map(|d| d.date).collect();
    assert_eq!(rejoined, original);

    // every page but the last meets the page size
    for page in &pages[..pages.len() - 1] {
        assert!(page.article_count() >= 4);
    }
}

#[test]
fn test_paginate_small_and_empty_inputs() {
    let pages = paginate_days(&three_days(), 10);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].article_count(), 9);

    assert!(paginate_days(&[], 10).is_empty());
}

// limit 5 over 2, 3, 4: the first two days spend the budget exactly
#[test]
fn test_limit_stops_once_budget_is_spent() {
    let limited = limit_days(three_days(), 5);
    assert_eq!(counts(&limited), vec![2, 3]);
}

// a day larger than what remains is cut to one less than the remaining budget
#[test]
fn test_limit_truncates_overflowing_day_to_remaining_minus_one() {
    let limited = limit_days(three_days(), 4);
    // 2 spent, 2 remain, the 3-article day keeps 2 - 1 = 1; the 4-article day
    // can't fit in the single remaining article and is dropped
    assert_eq!(counts(&limited), vec![2, 1]);

    let limited = limit_days(three_days(), 8);
    // 5 spent, 3 remain, the 4-article day keeps 3 - 1 = 2
    assert_eq!(counts(&limited), vec![2, 3, 2]);
}

// the article left over after a cut day still reaches a later day that fits
#[test]
fn test_limit_keeps_walking_after_a_cut_day() {
    let days = vec![
        stub_day((2014, 3, 19), 2),
        stub_day((2014, 3, 18), 3),
        stub_day((2014, 3, 17), 1),
        stub_day((2014, 3, 16), 1),
    ];

    let limited = limit_days(days, 4);

    assert_eq!(counts(&limited), vec![2, 1, 1]);
    assert_eq!(
        limited.last().unwrap().date,
        chrono::NaiveDate::from_ymd_opt(2014, 3, 17).unwrap()
    );
}

#[test]
fn test_limit_never_emits_empty_days() {
    // 1 remains for every day: each would keep zero articles, so all are dropped
    let limited = limit_days(three_days(), 1);
    assert!(limited.is_empty());

    assert!(limit_days(three_days(), 0).is_empty());
    assert_eq!(counts(&limit_days(three_days(), 100)), vec![2, 3, 4]);
}

// January is month 0 and must still filter
#[test]
fn test_filter_treats_january_as_a_real_filter() {
    let days = vec![
        stub_day((2015, 3, 2), 1),
        stub_day((2015, 1, 20), 1),
        stub_day((2014, 1, 5), 1),
    ];

    let january = filter_days(
        &days,
        DayFilter {
            month0: Some(0),
            ..DayFilter::default()
        },
    );
    assert_eq!(january.len(), 2);
    assert!(january.iter().all(|d| d.date.format("%m").to_string() == "01"));

    let january_2015 = filter_days(
        &days,
        DayFilter {
            year: Some(2015),
            month0: Some(0),
            day: None,
        },
    );
    assert_eq!(january_2015.len(), 1);

    // no fields set keeps everything
    assert_eq!(filter_days(&days, DayFilter::default()).len(), 3);
}
