//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{EventLink, LinkRule, RecurrenceRule, Timezone};
use proptest::prelude::*;

// ============================================================================
// LinkRule Property Tests
// ============================================================================

mod link_rule_tests {
    use super::*;

    proptest! {
        #[test]
        fn pair_roundtrip(
            keyword in "[A-Za-z][A-Za-z0-9 ]{0,15}[A-Za-z0-9]",
            page in "[A-Za-z0-9]{1,20}"
        ) {
            let replacement = format!("[[{page}]]");
            let rule = LinkRule::parse_pair(&format!("{keyword}={replacement}")).unwrap();
            prop_assert_eq!(rule.keyword(), keyword.as_str());
            prop_assert_eq!(rule.replacement(), replacement.as_str());
        }

        #[test]
        fn list_preserves_count_and_order(
            keywords in prop::collection::vec("[A-Za-z]{1,10}", 0..8)
        ) {
            let input = keywords
                .iter()
                .map(|k| format!("{k}=[[{k}]]"))
                .collect::<Vec<_>>()
                .join("¦");
            let rules = LinkRule::parse_list(&input).unwrap();
            prop_assert_eq!(rules.len(), keywords.len());
            for (rule, keyword) in rules.iter().zip(&keywords) {
                prop_assert_eq!(rule.keyword(), keyword.as_str());
            }
        }

        #[test]
        fn apply_without_keyword_is_identity(text in "[a-z ]{0,40}") {
            let rule = LinkRule::new("XYZ", "[[XYZ]]").unwrap();
            prop_assert_eq!(rule.apply(&text), text);
        }

        #[test]
        fn apply_removes_keyword_when_replacement_lacks_it(
            prefix in "[a-z ]{0,10}",
            suffix in "[a-z ]{0,10}"
        ) {
            let rule = LinkRule::new("Entropia", "[https://entropia.de E]").unwrap();
            let applied = rule.apply(&format!("{prefix}Entropia{suffix}"));
            prop_assert!(!applied.contains("Entropia"));
            prop_assert!(applied.contains("[https://entropia.de E]"));
        }

        #[test]
        fn pair_without_equals_rejected(text in "[A-Za-z ]{1,20}") {
            prop_assert!(LinkRule::parse_pair(&text).is_err());
        }
    }
}

// ============================================================================
// RecurrenceRule Property Tests
// ============================================================================

mod recurrence_rule_tests {
    use super::*;

    proptest! {
        #[test]
        fn parse_never_panics(input in ".{0,60}") {
            let _ = RecurrenceRule::parse(&input);
        }

        #[test]
        fn weekly_interval_is_described(interval in 2u32..52) {
            let rule = RecurrenceRule::parse(&format!("FREQ=WEEKLY;INTERVAL={interval}")).unwrap();
            prop_assert_eq!(rule.describe(), format!("alle {interval} Wochen"));
        }

        #[test]
        fn description_is_never_empty(
            freq in prop_oneof![
                Just("DAILY"),
                Just("WEEKLY"),
                Just("MONTHLY"),
                Just("YEARLY"),
                Just("HOURLY"),
            ],
            interval in 1u32..10,
            day in prop_oneof![Just(""), Just(";BYDAY=MO"), Just(";BYDAY=2WE"), Just(";BYDAY=-1FR")]
        ) {
            let rule = RecurrenceRule::parse(&format!("FREQ={freq};INTERVAL={interval}{day}")).unwrap();
            prop_assert!(!rule.describe().is_empty());
        }
    }
}

// ============================================================================
// EventLink Property Tests
// ============================================================================

mod event_link_tests {
    use super::*;

    proptest! {
        #[test]
        fn internal_link_wraps_title(page in "[A-Za-z0-9]{1,20}", title in "[A-Za-z0-9 ]{1,20}") {
            let link = EventLink::from_description(&format!("[[{page}]]")).unwrap();
            prop_assert_eq!(link.wrap(&title), format!("[[{page}|{title}]]"));
        }

        #[test]
        fn text_without_brackets_has_no_link(text in "[A-Za-z0-9 .,]{0,40}") {
            prop_assert!(EventLink::from_description(&text).is_none());
        }
    }
}

// ============================================================================
// Timezone Property Tests
// ============================================================================

mod timezone_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_timezone_names_accepted(
            tz in prop_oneof![
                Just("UTC"),
                Just("Europe/Berlin"),
                Just("America/New_York"),
                Just("Asia/Tokyo"),
                Just("Australia/Sydney"),
            ]
        ) {
            let timezone = Timezone::parse(tz).unwrap();
            prop_assert_eq!(timezone.name(), tz);
        }

        #[test]
        fn timezone_serialization_roundtrip(
            tz in prop_oneof![
                Just("UTC"),
                Just("Europe/Berlin"),
                Just("America/New_York"),
            ]
        ) {
            let timezone = Timezone::parse(tz).unwrap();
            let json = serde_json::to_string(&timezone).unwrap();
            let deserialized: Timezone = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(timezone, deserialized);
        }
    }
}
