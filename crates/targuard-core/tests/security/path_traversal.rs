//! Path traversal attacks.

use std::path::Path;

use targuard_core::ArchiveEntry;
use targuard_core::EntryKind;
use targuard_core::ExtractionError;
use targuard_core::RejectReason;
use targuard_core::SecurityConfig;
use targuard_core::Verdict;
use targuard_core::extract;
use targuard_core::security::EntryValidator;
use targuard_core::test_utils::TarTestBuilder;

use crate::create_test_dest;

#[test]
fn test_parent_traversal_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    for name in [
        "../etc/passwd",
        "../../etc/passwd",
        "foo/../../etc/passwd",
        "foo/bar/../../../etc/passwd",
        "./../escape",
    ] {
        let entry = ArchiveEntry::new(name, EntryKind::RegularFile).with_size(1024);
        assert!(
            matches!(
                validator.validate_entry(&entry),
                Err(ExtractionError::UnsafePath { .. })
            ),
            "path should be rejected: {name}"
        );
    }
}

#[test]
fn test_absolute_path_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    for name in ["/etc/passwd", "/tmp/malicious", "//double/slash"] {
        let entry = ArchiveEntry::new(name, EntryKind::RegularFile);
        assert_eq!(
            validator.verdict(&entry),
            Verdict::Rejected(RejectReason::UnsafePath),
            "{name}"
        );
    }
}

#[test]
fn test_absolute_path_inside_target_still_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    let inside = dest.as_path().join("good/course.xml");
    let entry = ArchiveEntry::new(inside, EntryKind::RegularFile);
    assert_eq!(
        validator.verdict(&entry),
        Verdict::Rejected(RejectReason::UnsafePath)
    );
}

#[test]
fn test_embedded_dotdot_that_stays_inside_is_accepted() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    let entry = ArchiveEntry::new("a/b/../c.txt", EntryKind::RegularFile);
    let validated = validator.validate_entry(&entry).unwrap();
    assert_eq!(validated.safe_path.as_path(), dest.as_path().join("a/c.txt"));
}

#[test]
fn test_root_names_for_files_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    for name in ["", ".", "./", "a/.."] {
        let entry = ArchiveEntry::new(name, EntryKind::RegularFile);
        assert_eq!(
            validator.verdict(&entry),
            Verdict::Rejected(RejectReason::UnsafePath),
            "{name:?}"
        );
    }

    let dir = ArchiveEntry::new("./", EntryKind::Directory);
    assert_eq!(validator.verdict(&dir), Verdict::Accepted);
}

#[test]
fn test_traversal_writes_nothing_outside() {
    let parent = tempfile::TempDir::new().unwrap();
    let target = parent.path().join("target");
    std::fs::create_dir(&target).unwrap();

    let data = TarTestBuilder::new()
        .add_raw_file("../outside.txt", b"pwned")
        .build_gz();
    let err = extract(data.as_slice(), &target, &SecurityConfig::default()).unwrap_err();

    assert_eq!(err.rejection_reason(), Some(RejectReason::UnsafePath));
    assert_eq!(err.entry_name(), Some(Path::new("../outside.txt")));
    assert!(!parent.path().join("outside.txt").exists());
}

#[test]
fn test_safe_paths_allowed() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    for name in [
        "file.txt",
        "dir/file.txt",
        "a/b/c/d/e/file.txt",
        "./course.xml",
        "..hidden/file",
        "file..txt",
    ] {
        let entry = ArchiveEntry::new(name, EntryKind::RegularFile);
        assert!(validator.validate_entry(&entry).is_ok(), "{name}");
    }
}
