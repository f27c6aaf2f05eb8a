use std::fs;

use packet_core::{ErrorCode, RequestFailure};
use packet_engine::{AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path());

    let first = writer.write("ad.html", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "ad.html");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("ad.html", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_when_target_dir_is_missing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let err = writer.write("ad.html", "data").unwrap_err();
    assert!(matches!(err, PersistError::TargetDir(_)));
    assert!(!file_path.with_file_name("ad.html").exists());
    assert_eq!(RequestFailure::from(err).code, ErrorCode::PdfRenderFailed);
}

#[test]
fn permission_errors_map_to_access_denied() {
    let denied = PersistError::Io(std::io::ErrorKind::PermissionDenied.into());
    assert_eq!(RequestFailure::from(denied).code, ErrorCode::AccessDenied);

    let other = PersistError::Io(std::io::Error::other("disk full"));
    let failure = RequestFailure::from(other);
    assert_eq!(failure.code, ErrorCode::PdfRenderFailed);
    assert!(failure.message.contains("disk full"));
}
