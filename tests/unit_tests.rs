// Unit tests for the Ember API core

use chrono::{TimeZone, Utc};
use ember_api::core::clock::{Clock, ManualClock};
use ember_api::core::filters::{CandidateFilter, SqlValue};
use ember_api::models::{Preference, PreferredGender, SwipeDirection};

fn preferences(gender: PreferredGender, min_age: i32, max_age: i32) -> Preference {
    Preference {
        preferred_gender: gender,
        min_age,
        max_age,
        ..Preference::unset(1)
    }
}

#[test]
fn test_filter_base_query_excludes_viewer_and_deleted() {
    let filter = CandidateFilter::from_preferences(1, &preferences(PreferredGender::Unset, 0, 0));
    let (sql, params) = filter.to_sql();

    assert!(sql.contains("u.is_deleted = FALSE"));
    assert!(sql.contains("u.id <> $1"));
    assert_eq!(params, vec![SqlValue::Int(1)]);
}

#[test]
fn test_filter_orders_by_id_for_determinism() {
    let filter = CandidateFilter::from_preferences(1, &preferences(PreferredGender::Female, 20, 30));
    let (sql, _) = filter.to_sql();

    assert!(sql.ends_with("ORDER BY u.id ASC"));
}

#[test]
fn test_filter_gender_both_and_unset_filter_nothing() {
    for gender in [PreferredGender::Both, PreferredGender::Unset] {
        let filter = CandidateFilter::from_preferences(1, &preferences(gender, 0, 0));
        let (sql, params) = filter.to_sql();

        assert!(!sql.contains("p.gender"), "no gender predicate for {:?}", gender);
        assert_eq!(params.len(), 1);
        assert!(filter.matches(2, "male", 30, false));
        assert!(filter.matches(3, "female", 30, false));
    }
}

#[test]
fn test_filter_zero_age_bounds_are_unbounded() {
    let filter = CandidateFilter::from_preferences(1, &preferences(PreferredGender::Unset, 0, 0));

    assert!(filter.matches(2, "female", 18, false));
    assert!(filter.matches(3, "female", 99, false));
}

#[test]
fn test_filter_age_bounds_inclusive_both_ends() {
    // gender: female, min_age: 25, max_age: 35
    let filter = CandidateFilter::from_preferences(1, &preferences(PreferredGender::Female, 25, 35));

    assert!(!filter.matches(2, "female", 24, false), "24 must be excluded");
    assert!(filter.matches(3, "female", 25, false), "25 must be included");
    assert!(filter.matches(4, "female", 35, false), "35 must be included");
    assert!(!filter.matches(5, "female", 36, false), "36 must be excluded");
}

#[test]
fn test_filter_bind_positions_match_predicates() {
    let filter = CandidateFilter::from_preferences(9, &preferences(PreferredGender::Male, 21, 40));
    let (sql, params) = filter.to_sql();

    assert!(sql.contains("p.gender = $2"));
    assert!(sql.contains("p.age >= $3"));
    assert!(sql.contains("p.age <= $4"));
    assert_eq!(
        params,
        vec![
            SqlValue::Int(9),
            SqlValue::Text("male".to_string()),
            SqlValue::Int(21),
            SqlValue::Int(40),
        ]
    );
}

#[test]
fn test_filter_min_age_only() {
    let filter = CandidateFilter::from_preferences(1, &preferences(PreferredGender::Unset, 30, 0));
    let (sql, params) = filter.to_sql();

    assert!(sql.contains("p.age >= $2"));
    assert!(!sql.contains("p.age <= "));
    assert_eq!(params.len(), 2);
    assert!(!filter.matches(2, "female", 29, false));
    assert!(filter.matches(3, "female", 30, false));
    assert!(filter.matches(4, "female", 80, false));
}

#[test]
fn test_clock_day_boundary_is_utc() {
    let clock = ManualClock::at(Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap());
    let before_midnight = clock.today();

    clock.set(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());
    let after_midnight = clock.today();

    assert_ne!(before_midnight, after_midnight);
    assert_eq!(after_midnight.to_string(), "2024-07-01");
}

#[test]
fn test_swipe_direction_wire_values() {
    assert_eq!(SwipeDirection::parse("like"), Some(SwipeDirection::Like));
    assert_eq!(SwipeDirection::parse("pass"), Some(SwipeDirection::Pass));
    assert_eq!(SwipeDirection::parse("LIKE"), None);
    assert_eq!(SwipeDirection::parse(""), None);

    assert_eq!(SwipeDirection::Like.as_str(), "like");
    assert_eq!(SwipeDirection::Pass.as_str(), "pass");
}

#[test]
fn test_preferred_gender_column_roundtrip() {
    for (text, expected) in [
        ("male", PreferredGender::Male),
        ("female", PreferredGender::Female),
        ("both", PreferredGender::Both),
        ("", PreferredGender::Unset),
    ] {
        assert_eq!(PreferredGender::from_column(text), expected);
        assert_eq!(expected.as_str(), text);
    }
}
