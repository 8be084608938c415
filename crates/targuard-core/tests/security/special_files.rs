//! Special file entries.

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
fn test_special_kinds_always_rejected() {
    let (_temp, dest) = create_test_dest();
    let config = SecurityConfig::default();
    let mut validator = EntryValidator::new(&config, &dest);

    for kind in [
        EntryKind::Fifo,
        EntryKind::CharacterDevice,
        EntryKind::BlockDevice,
        EntryKind::Other,
    ] {
        let entry = ArchiveEntry::new("dev/node", kind);
        assert_eq!(
            validator.verdict(&entry),
            Verdict::Rejected(RejectReason::DisallowedEntryKind),
            "{kind}"
        );
    }
}

#[test]
fn test_fifo_rejected_end_to_end() {
    let temp = tempfile::TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("good/course.xml", b"<course/>")
        .add_fifo("fifo.file")
        .build_gz();

    let err = extract(data.as_slice(), temp.path(), &SecurityConfig::default()).unwrap_err();

    match err {
        ExtractionError::DisallowedEntryKind { entry, kind } => {
            assert_eq!(entry, std::path::PathBuf::from("fifo.file"));
            assert_eq!(kind, EntryKind::Fifo);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!temp.path().join("fifo.file").exists());
}

#[test]
fn test_device_nodes_rejected_end_to_end() {
    for data in [
        TarTestBuilder::new().add_char_device("dev/null").build(),
        TarTestBuilder::new().add_block_device("dev/sda").build(),
    ] {
        let temp = tempfile::TempDir::new().unwrap();
        let err = extract(data.as_slice(), temp.path(), &SecurityConfig::default()).unwrap_err();
        assert_eq!(err.rejection_reason(), Some(RejectReason::DisallowedEntryKind));
        assert!(!temp.path().join("dev").exists());
    }
}

#[test]
fn test_unknown_type_flag_rejected() {
    let temp = tempfile::TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_with_type("volume", tar::EntryType::new(b'Z'))
        .build();

    let err = extract(data.as_slice(), temp.path(), &SecurityConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::DisallowedEntryKind {
            kind: EntryKind::Other,
            ..
        }
    ));
}
