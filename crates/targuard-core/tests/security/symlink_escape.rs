//! Symlink escape attacks.

use targuard_core::ArchiveEntry;
use targuard_core::ExtractionError;
use targuard_core::RejectReason;
use targuard_core::SecurityConfig;
use targuard_core::Verdict;
use targuard_core::extract;
use targuard_core::security::EntryValidator;
use targuard_core::test_utils::TarTestBuilder;

use crate::create_test_dest;

#[test]
fn test_symlink_absolute_target() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    let entry = ArchiveEntry::symlink("symlink.txt", "/etc/passwd");
    assert!(matches!(
        validator.validate_entry(&entry),
        Err(ExtractionError::UnsafeSymlinkTarget { .. })
    ));
}

#[test]
fn test_symlink_absolute_target_inside_root_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    let inside = dest.as_path().join("course.xml");
    let entry = ArchiveEntry::symlink("link", inside);
    assert_eq!(
        validator.verdict(&entry),
        Verdict::Rejected(RejectReason::UnsafeSymlinkTarget)
    );
}

#[test]
fn test_symlink_parent_traversal() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    for (link, target) in [
        ("symlink.txt", "../unsafe_file.txt"),
        ("a/b/link", "../../../etc"),
        ("a/link", "b/../../../x"),
    ] {
        let entry = ArchiveEntry::symlink(link, target);
        assert_eq!(
            validator.verdict(&entry),
            Verdict::Rejected(RejectReason::UnsafeSymlinkTarget),
            "{link} -> {target}"
        );
    }
}

#[test]
fn test_symlink_relative_safe() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    for (link, target) in [
        ("link", "course.xml"),
        ("a/b/link", "../../course.xml"),
        ("a/link", "."),
    ] {
        let entry = ArchiveEntry::symlink(link, target);
        assert_eq!(validator.verdict(&entry), Verdict::Accepted, "{link}");
    }
}

#[test]
fn test_symlink_disabled_by_strict_config() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::strict();
    let mut validator = EntryValidator::new(&config, &dest);

    let entry = ArchiveEntry::symlink("link", "target.txt");
    assert!(matches!(
        validator.validate_entry(&entry),
        Err(ExtractionError::DisallowedEntryKind { .. })
    ));
}

#[test]
fn test_entry_through_archive_symlink_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    assert_eq!(
        validator.verdict(&ArchiveEntry::symlink("a/up", "..")),
        Verdict::Accepted
    );
    let through = ArchiveEntry::new("a/up/file.txt", targuard_core::EntryKind::RegularFile);
    assert_eq!(
        validator.verdict(&through),
        Verdict::Rejected(RejectReason::UnsafePath)
    );
}

#[cfg(unix)]
#[test]
fn test_dotdot_after_symlink_is_resolved_lexically() {
    let parent = tempfile::TempDir::new().unwrap();
    let target = parent.path().join("target");
    std::fs::create_dir(&target).unwrap();

    // Followed physically, a/b/../.. would leave the target.
    let data = TarTestBuilder::new()
        .add_directory("a/")
        .add_symlink("a/b", ".")
        .add_raw_file("a/b/../../escape.txt", b"x")
        .build();
    extract(data.as_slice(), &target, &SecurityConfig::default()).unwrap();

    assert!(target.join("escape.txt").is_file());
    assert!(!parent.path().join("escape.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_symlink_escape_end_to_end() {
    let parent = tempfile::TempDir::new().unwrap();
    let target = parent.path().join("target");
    std::fs::create_dir(&target).unwrap();

    let data = TarTestBuilder::new()
        .add_symlink("symlink.txt", "../unsafe_file.txt")
        .build_gz();
    let err = extract(data.as_slice(), &target, &SecurityConfig::default()).unwrap_err();

    assert_eq!(err.rejection_reason(), Some(RejectReason::UnsafeSymlinkTarget));
    assert!(std::fs::symlink_metadata(target.join("symlink.txt")).is_err());
}

#[cfg(unix)]
#[test]
fn test_symlink_chain_climbing_out_of_symlink_rejected() {
    let parent = tempfile::TempDir::new().unwrap();
    let target = parent.path().join("scratch");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(parent.path().join("secret.txt"), b"SECRET").unwrap();

    // Lexically m stays inside, but the kernel resolves l first and then
    // takes the parent of the target directory.
    let data = TarTestBuilder::new()
        .add_symlink("l", ".")
        .add_symlink("m", "l/../secret.txt")
        .build_gz();

    let report = targuard_core::inspect(data.as_slice(), &SecurityConfig::default()).unwrap();
    assert_eq!(report.entries[0].verdict, Verdict::Accepted);
    assert_eq!(
        report.entries[1].verdict,
        Verdict::Rejected(RejectReason::UnsafeSymlinkTarget)
    );

    let err = extract(data.as_slice(), &target, &SecurityConfig::default()).unwrap_err();
    assert_eq!(err.rejection_reason(), Some(RejectReason::UnsafeSymlinkTarget));
    assert!(std::fs::symlink_metadata(target.join("m")).is_err());
}

#[cfg(unix)]
#[test]
fn test_symlink_climbing_out_of_existing_disk_symlink_rejected() {
    let (_temp, dest) = create_test_dest();
    std::os::unix::fs::symlink(".", dest.as_path().join("pre")).unwrap();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    let entry = ArchiveEntry::symlink("m", "pre/../outside.txt");
    assert_eq!(
        validator.verdict(&entry),
        Verdict::Rejected(RejectReason::UnsafeSymlinkTarget)
    );
}

#[cfg(unix)]
#[test]
fn test_symlink_chain_without_climbing_is_accepted() {
    let temp = tempfile::TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_directory("sub/")
        .add_file("sub/course.xml", b"<course/>")
        .add_symlink("l", "sub")
        .add_symlink("m", "l/course.xml")
        .add_symlink("sub/up", "../sub/course.xml")
        .build();

    let report = extract(data.as_slice(), temp.path(), &SecurityConfig::default()).unwrap();

    assert_eq!(report.symlinks_created, 3);
    assert_eq!(std::fs::read(temp.path().join("m")).unwrap(), b"<course/>");
}
