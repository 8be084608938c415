//! Hardlink attacks.

use targuard_core::ArchiveEntry;
use targuard_core::ExtractionError;
use targuard_core::RejectReason;
use targuard_core::SecurityConfig;
use targuard_core::Verdict;
use targuard_core::security::EntryValidator;
use targuard_core::security::ValidatedEntryType;

use crate::create_test_dest;

#[test]
fn test_hardlink_absolute_target() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    let entry = ArchiveEntry::hardlink("link", "/etc/shadow");
    assert!(matches!(
        validator.validate_entry(&entry),
        Err(ExtractionError::UnsafeSymlinkTarget { .. })
    ));
}

#[test]
fn test_hardlink_parent_traversal() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    for target in ["../outside", "a/../../outside", "../../etc/passwd"] {
        let entry = ArchiveEntry::hardlink("link", target);
        assert_eq!(
            validator.verdict(&entry),
            Verdict::Rejected(RejectReason::UnsafeSymlinkTarget),
            "{target}"
        );
    }
}

#[test]
fn test_hardlink_to_root_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    let entry = ArchiveEntry::hardlink("link", ".");
    assert_eq!(
        validator.verdict(&entry),
        Verdict::Rejected(RejectReason::UnsafeSymlinkTarget)
    );
}

#[test]
fn test_hardlink_disabled_by_strict_config() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::strict();
    let mut validator = EntryValidator::new(&config, &dest);

    let entry = ArchiveEntry::hardlink("link", "file.txt");
    assert!(matches!(
        validator.validate_entry(&entry),
        Err(ExtractionError::DisallowedEntryKind { .. })
    ));
}

#[test]
fn test_hardlink_resolves_from_root_not_link_dir() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    let entry = ArchiveEntry::hardlink("deep/dir/link", "course.xml");
    let validated = validator.validate_entry(&entry).unwrap();
    match validated.entry_type {
        ValidatedEntryType::Hardlink { target } => {
            assert_eq!(target.as_path(), dest.as_path().join("course.xml"));
        }
        other => panic!("unexpected entry type: {other:?}"),
    }
}

#[test]
fn test_hardlink_to_archive_symlink_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    assert_eq!(
        validator.verdict(&ArchiveEntry::symlink("a/up", "..")),
        Verdict::Accepted
    );
    assert_eq!(
        validator.verdict(&ArchiveEntry::hardlink("copy", "a/up")),
        Verdict::Rejected(RejectReason::UnsafeSymlinkTarget)
    );
}

#[cfg(unix)]
#[test]
fn test_hardlink_end_to_end_shares_inode() {
    use std::os::unix::fs::MetadataExt;
    use targuard_core::test_utils::TarTestBuilder;

    let temp = tempfile::TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("course.xml", b"<course/>")
        .add_hardlink("copy.xml", "course.xml")
        .build();
    let report =
        targuard_core::extract(data.as_slice(), temp.path(), &SecurityConfig::default()).unwrap();

    assert_eq!(report.hardlinks_created, 1);
    let original = std::fs::metadata(temp.path().join("course.xml")).unwrap();
    let linked = std::fs::metadata(temp.path().join("copy.xml")).unwrap();
    assert_eq!(original.ino(), linked.ino());
}
