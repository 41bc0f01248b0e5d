//! Integration tests for archive persistence

use fuel_mix_archiver::store::{publish, ArchiveLock, ArchiveStore};
use fuel_mix_archiver::Row;
use tempfile::TempDir;

fn rows() -> Vec<Row> {
    vec![
        Row::from_fields(["FUELINST", "20230621", "23", "20230621114500", "6030", "864"]),
        Row::from_fields(["FUELINST", "20230621", "23", "20230621115000", "6100", "870"]),
    ]
}

#[test]
fn test_archive_survives_save_load_cycle() {
    let dir = TempDir::new().unwrap();
    let store = ArchiveStore::new(dir.path().join("fuelinst.csv.gz"));

    assert!(store.save(&rows()).unwrap());
    assert_eq!(store.load().unwrap().unwrap(), rows());
}

#[test]
fn test_archive_file_is_gzip_compressed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fuelinst.csv.gz");
    ArchiveStore::new(&path).save(&rows()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    // Gzip magic bytes.
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
}

#[test]
fn test_resave_identical_rows_reports_no_replacement() {
    let dir = TempDir::new().unwrap();
    let store = ArchiveStore::new(dir.path().join("fuelinst.csv.gz"));

    assert!(store.save(&rows()).unwrap());
    assert!(!store.save(&rows()).unwrap());
}

#[test]
fn test_publish_primitive_swaps_content_atomically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fuelinst.csv.gz");

    assert!(publish(&path, b"one").unwrap());
    assert!(publish(&path, b"two").unwrap());
    assert!(!publish(&path, b"two").unwrap());
    assert_eq!(std::fs::read(&path).unwrap(), b"two");

    // No temp-file droppings left behind.
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_writer_lock_serializes_read_modify_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fuelinst.csv.gz");

    let mut lock = ArchiveLock::new(&path).unwrap();
    let guard = lock.lock().unwrap();

    // A second ingest run must not get the lock while the first holds it.
    let mut other = ArchiveLock::new(&path).unwrap();
    assert!(other.try_lock().is_err());

    drop(guard);
    assert!(other.try_lock().is_ok());
}
