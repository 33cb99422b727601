//! Multi-table reconciliation scenarios, exercised over plain local paths
//! so no `scp`/`xrdcp` tooling is required.

use std::num::NonZeroUsize;
use std::time::{Duration, UNIX_EPOCH};

use manager::{Manager, ManagerRegistration};
use table::{FileInfo, FileMarks, Table};

fn worker_count(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

/// Marks refresh against the real file on disk, so a replica's effective
/// timestamp is its actual mtime rather than whatever was last persisted in
/// the table. Set mtimes explicitly so the authoritative pick is
/// deterministic instead of depending on how fast the two writes above ran.
fn set_mtime(path: &std::path::Path, secs_since_epoch: u64) {
    let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs_since_epoch)).unwrap();
}

#[test]
fn reconcile_propagates_the_newer_replica_to_the_older_one() {
    let dir = tempfile::tempdir().unwrap();

    let file_old = dir.path().join("old.bin");
    let file_new = dir.path().join("new.bin");
    std::fs::write(&file_old, b"stale payload").unwrap();
    std::fs::write(&file_new, b"fresh payload").unwrap();
    set_mtime(&file_old, 100);
    set_mtime(&file_new, 200);

    let fid_old = checksums::hash_file(&file_old).unwrap();
    let fid_new = checksums::hash_file(&file_new).unwrap();

    let loc_a = dir.path().join("a.json");
    let loc_b = dir.path().join("b.json");

    let mut table_a = Table::create("");
    table_a.add(
        FileInfo::from_fields(
            "shared",
            file_old.to_str().unwrap(),
            FileMarks::new(100.0, fid_old).unwrap(),
        )
        .unwrap(),
    );
    table_a.write(&loc_a).unwrap();

    let mut table_b = Table::create("");
    table_b.add(
        FileInfo::from_fields(
            "shared",
            file_new.to_str().unwrap(),
            FileMarks::new(200.0, fid_new.clone()).unwrap(),
        )
        .unwrap(),
    );
    table_b.write(&loc_b).unwrap();

    let mut registration = ManagerRegistration::new();
    registration.register(loc_a.to_str().unwrap()).unwrap();
    registration.register(loc_b.to_str().unwrap()).unwrap();

    let report = Manager::with_worker_count(registration, worker_count(2))
        .update()
        .unwrap();

    assert_eq!(report.scheduled, 1);
    assert_eq!(report.succeeded, 1);
    assert!(report.failures.is_empty());

    assert_eq!(std::fs::read(&file_old).unwrap(), b"fresh payload");

    let reloaded_a = Table::read(&loc_a).unwrap();
    let entry = reloaded_a.get("shared").unwrap();
    assert!(!entry.marks().is_sentinel());
    assert_eq!(entry.marks().fingerprint(), fid_new);
}

#[test]
fn reconcile_fills_a_sentinel_replica_from_its_authoritative_peer() {
    let dir = tempfile::tempdir().unwrap();

    let source_file = dir.path().join("source.bin");
    std::fs::write(&source_file, b"real content").unwrap();
    let fid_source = checksums::hash_file(&source_file).unwrap();

    let pending_file = dir.path().join("pending.bin");

    let loc_bare = dir.path().join("bare.json");
    let loc_filled = dir.path().join("filled.json");

    let mut table_bare = Table::create("");
    table_bare.add(FileInfo::bare("shared", pending_file.to_str().unwrap()).unwrap());
    table_bare.write(&loc_bare).unwrap();

    let mut table_filled = Table::create("");
    table_filled.add(
        FileInfo::from_fields(
            "shared",
            source_file.to_str().unwrap(),
            FileMarks::new(200.0, fid_source.clone()).unwrap(),
        )
        .unwrap(),
    );
    table_filled.write(&loc_filled).unwrap();

    let mut registration = ManagerRegistration::new();
    registration.register(loc_bare.to_str().unwrap()).unwrap();
    registration.register(loc_filled.to_str().unwrap()).unwrap();

    let report = Manager::with_worker_count(registration, worker_count(2))
        .update()
        .unwrap();

    assert_eq!(report.scheduled, 1);
    assert_eq!(report.succeeded, 1);
    assert!(report.failures.is_empty());

    assert_eq!(std::fs::read(&pending_file).unwrap(), b"real content");

    let reloaded_bare = Table::read(&loc_bare).unwrap();
    let entry = reloaded_bare.get("shared").unwrap();
    assert!(!entry.marks().is_sentinel());
    assert_eq!(entry.marks().fingerprint(), fid_source);
    assert!(entry.marks().timestamp() >= 200.0);
}

#[test]
fn reconcile_is_a_no_op_when_every_replica_already_matches() {
    let dir = tempfile::tempdir().unwrap();

    let file_a = dir.path().join("a.bin");
    let file_b = dir.path().join("b.bin");
    std::fs::write(&file_a, b"same content").unwrap();
    std::fs::write(&file_b, b"same content").unwrap();
    let fid = checksums::hash_file(&file_a).unwrap();

    let loc_a = dir.path().join("a.json");
    let loc_b = dir.path().join("b.json");

    let mut table_a = Table::create("");
    table_a.add(
        FileInfo::from_fields("shared", file_a.to_str().unwrap(), FileMarks::new(100.0, fid.clone()).unwrap())
            .unwrap(),
    );
    table_a.write(&loc_a).unwrap();

    let mut table_b = Table::create("");
    table_b.add(
        FileInfo::from_fields("shared", file_b.to_str().unwrap(), FileMarks::new(150.0, fid).unwrap()).unwrap(),
    );
    table_b.write(&loc_b).unwrap();

    let mut registration = ManagerRegistration::new();
    registration.register(loc_a.to_str().unwrap()).unwrap();
    registration.register(loc_b.to_str().unwrap()).unwrap();

    let report = Manager::with_worker_count(registration, worker_count(2))
        .update()
        .unwrap();

    assert_eq!(report.scheduled, 0);
    assert_eq!(report.succeeded, 0);
    assert!(report.failures.is_empty());
}
