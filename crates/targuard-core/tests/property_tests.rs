//! Property-based tests for containment and quota invariants.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::path::PathBuf;

use proptest::prelude::*;
use targuard_core::ArchiveEntry;
use targuard_core::EntryKind;
use targuard_core::SecurityConfig;
use targuard_core::Verdict;
use targuard_core::security::EntryValidator;
use targuard_core::security::QuotaTracker;
use targuard_core::security::containment::is_within;
use targuard_core::security::containment::normalize_lexical;
use targuard_core::types::DestDir;
use tempfile::TempDir;

fn create_test_dest() -> (TempDir, DestDir) {
    let temp = TempDir::new().unwrap();
    let dest = DestDir::new(temp.path()).unwrap();
    (temp, dest)
}

/// Relative names built from normal segments, `.` and `..`.
fn entry_name() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => "[a-z]{1,8}",
            1 => Just(".".to_string()),
            2 => Just("..".to_string()),
        ],
        1..8,
    )
    .prop_map(|segments| segments.join("/"))
}

/// Lowest depth reached while walking the segments; negative means the name
/// walked out.
fn min_depth(name: &str) -> i32 {
    let mut depth = 0i32;
    let mut min = 0i32;
    for segment in name.split('/') {
        match segment {
            "." | "" => {}
            ".." => depth -= 1,
            _ => depth += 1,
        }
        min = min.min(depth);
    }
    min
}

proptest! {
    #[test]
    fn prop_accepted_paths_stay_inside(name in entry_name()) {
        let (_temp, dest) = create_test_dest();
        let config = SecurityConfig::default();
        let mut validator = EntryValidator::new(&config, &dest);

        let entry = ArchiveEntry::new(name.as_str(), EntryKind::RegularFile);
        if let Ok(validated) = validator.validate_entry(&entry) {
            prop_assert!(validated.safe_path.as_path().starts_with(dest.as_path()));
            prop_assert!(validated.safe_path.as_path() != dest.as_path());
        }
    }

    #[test]
    fn prop_verdict_matches_lexical_depth(name in entry_name()) {
        let (_temp, dest) = create_test_dest();
        let config = SecurityConfig::default();
        let mut validator = EntryValidator::new(&config, &dest);

        // Once a name rises above the root it cannot come back in: the
        // generated segments never match the temp dir's dotted name.
        let entry = ArchiveEntry::new(name.as_str(), EntryKind::Directory);
        let accepted = validator.verdict(&entry) == Verdict::Accepted;
        prop_assert_eq!(accepted, min_depth(&name) >= 0, "name: {}", name);
    }

    #[test]
    fn prop_leading_parent_always_rejected(rest in "[a-z]{1,8}(/[a-z]{1,8}){0,4}") {
        let (_temp, dest) = create_test_dest();
        let config = SecurityConfig::default();
        let mut validator = EntryValidator::new(&config, &dest);

        let entry = ArchiveEntry::new(format!("../{rest}"), EntryKind::RegularFile);
        prop_assert!(!validator.verdict(&entry).is_accepted());
    }

    #[test]
    fn prop_absolute_always_rejected(rest in "[a-z]{1,8}(/[a-z]{1,8}){0,4}") {
        let (_temp, dest) = create_test_dest();
        let config = SecurityConfig::default();
        let mut validator = EntryValidator::new(&config, &dest);

        let entry = ArchiveEntry::new(format!("/{rest}"), EntryKind::RegularFile);
        prop_assert!(!validator.verdict(&entry).is_accepted());
    }

    #[test]
    fn prop_normalize_is_idempotent(name in entry_name()) {
        let once = normalize_lexical(&Path::new("/base").join(&name));
        let twice = normalize_lexical(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_sibling_prefix_not_within(root in "[a-z]{1,8}", suffix in "[a-z0-9]{1,4}") {
        let base = PathBuf::from("/srv").join(&root);
        let sibling = PathBuf::from("/srv").join(format!("{root}{suffix}"));
        prop_assert!(!is_within(&base, &sibling));
        prop_assert!(is_within(&base, &base.join(&suffix)));
    }

    #[test]
    fn prop_symlink_target_escape_detection(
        depth in 0usize..5,
        ups in 0usize..8,
    ) {
        let (_temp, dest) = create_test_dest();
        let config = SecurityConfig::default();
        let mut validator = EntryValidator::new(&config, &dest);

        let mut link = (0..depth).map(|i| format!("d{i}")).collect::<Vec<_>>();
        link.push("link".to_string());
        let target = format!("{}x", "../".repeat(ups));

        let entry = ArchiveEntry::symlink(link.join("/"), target);
        // The link's parent sits `depth` levels below the root.
        prop_assert_eq!(validator.verdict(&entry).is_accepted(), ups <= depth);
    }

    #[test]
    fn prop_quota_file_count_enforcement(max in 1usize..20, attempts in 1usize..40) {
        let config = SecurityConfig {
            max_file_count: max,
            ..SecurityConfig::default()
        };
        let mut tracker = QuotaTracker::new();

        let accepted = (0..attempts)
            .filter(|_| tracker.record_file(1, &config).is_ok())
            .count();
        prop_assert_eq!(accepted, attempts.min(max));
        prop_assert_eq!(tracker.files_extracted(), attempts.min(max));
    }

    #[test]
    fn prop_quota_total_size_never_exceeded(
        max_total in 1u64..10_000,
        sizes in prop::collection::vec(0u64..2_000, 1..30),
    ) {
        let config = SecurityConfig {
            max_total_size: max_total,
            ..SecurityConfig::default()
        };
        let mut tracker = QuotaTracker::new();

        for size in sizes {
            let _ = tracker.record_file(size, &config);
            prop_assert!(tracker.bytes_written() <= max_total);
        }
    }

    #[test]
    fn prop_quota_no_overflow(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let config = SecurityConfig {
            max_file_size: u64::MAX,
            max_total_size: u64::MAX,
            ..SecurityConfig::default()
        };
        let mut tracker = QuotaTracker::new();

        tracker.record_file(a, &config).unwrap();
        let second = tracker.record_file(b, &config);
        prop_assert_eq!(second.is_ok(), a.checked_add(b).is_some());
    }
}

#[test]
fn min_depth_helper_sanity() {
    assert_eq!(min_depth("a/../.."), -1);
    assert_eq!(min_depth("a/b/../c"), 0);
    assert_eq!(min_depth("./a/."), 0);
}
