//! The per-name reconciliation algorithm behind [`crate::Manager::update`].

use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use table::{FileInfo, FileMarks, Table};

use crate::error::ManagerError;
use crate::registration::ManagerRegistration;
use crate::working_copy::working_file_name;

/// One `(name, destination location)` transfer that failed during
/// [`crate::Manager::update`].
#[derive(Clone, Debug)]
pub struct TransferFailure {
    /// The logical entry name being reconciled.
    pub name: String,
    /// The protocol-qualified path that did not receive the update.
    pub destination: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Summary of one [`crate::Manager::update`] call.
#[derive(Clone, Debug, Default)]
pub struct UpdateReport {
    /// Number of copies scheduled across all reconciled names.
    pub scheduled: usize,
    /// Number of scheduled copies that completed successfully.
    pub succeeded: usize,
    /// One entry per failed copy.
    pub failures: Vec<TransferFailure>,
}

struct LoadedTable {
    location: String,
    working_path: PathBuf,
    // Keeps the scoped temporary directory alive for the duration of the
    // reconciliation; released when the table drops out of scope.
    _scope: Option<tempfile::TempDir>,
    table: Table,
    changed: bool,
}

fn load_table(location: &str) -> Result<LoadedTable, ManagerError> {
    let classified = protocol::classify(location);
    if classified.is_local() {
        let working_path = protocol::local_path(location);
        let table = Table::read(&working_path)?;
        return Ok(LoadedTable {
            location: location.to_string(),
            working_path,
            _scope: None,
            table,
            changed: false,
        });
    }

    let scope = tempfile::tempdir().map_err(protocol::ProtocolError::from)?;
    let working_path = scope.path().join(working_file_name(location));
    protocol::copy(location, &working_path.display().to_string())?;
    let table = Table::read(&working_path)?;
    Ok(LoadedTable {
        location: location.to_string(),
        working_path,
        _scope: Some(scope),
        table,
        changed: false,
    })
}

/// Stats and hashes `dest_path` if it is reachable on this host, to recover
/// a real post-copy timestamp and fingerprint. Falls back to the
/// authoritative fingerprint paired with the current time when `dest_path`
/// can only be reached by delegating to an external transfer tool (for
/// example an SSH destination reconciled by a third coordinating host).
fn marks_after_copy(dest_path: &str, authoritative_fingerprint: &str) -> FileMarks {
    if let Some(local) = protocol::available_local_path(dest_path) {
        if let Some(marks) = stat_and_hash(&local) {
            return marks;
        }
    }
    let tmstp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    FileMarks::new(tmstp, authoritative_fingerprint.to_string()).unwrap_or_else(|_| FileMarks::sentinel())
}

fn stat_and_hash(local: &std::path::Path) -> Option<FileMarks> {
    let metadata = std::fs::metadata(local).ok()?;
    let modified = metadata.modified().ok()?;
    let tmstp = modified.duration_since(UNIX_EPOCH).ok()?.as_secs_f64();
    let fid = checksums::hash_file(local).ok()?;
    FileMarks::new(tmstp, fid).ok()
}

struct ScheduledCopy {
    name: String,
    src_path: String,
    dest_index: usize,
    dest_path: String,
    authoritative_fingerprint: String,
}

/// Reconciles every registered table: gathers them, computes the
/// authoritative replica per shared name, dispatches the necessary copies
/// in parallel, and writes back every table that changed.
///
/// # Errors
///
/// Returns [`ManagerError::AllTransfersFailed`] if at least one copy was
/// scheduled and none succeeded. Individual failures short of that are
/// recorded in the returned [`UpdateReport`] rather than raised.
pub(crate) fn reconcile(
    registration: &ManagerRegistration,
    worker_count: NonZeroUsize,
) -> Result<UpdateReport, ManagerError> {
    let mut loaded: Vec<LoadedTable> = registration
        .locations()
        .iter()
        .map(|location| load_table(location))
        .collect::<Result<_, _>>()?;

    let mut names: BTreeSet<String> = BTreeSet::new();
    for table in &loaded {
        names.extend(table.table.names().map(str::to_string));
    }

    let mut jobs: Vec<ScheduledCopy> = Vec::new();

    for name in &names {
        let present: Vec<(usize, FileInfo)> = loaded
            .iter()
            .enumerate()
            .filter_map(|(idx, lt)| lt.table.get(name).map(|info| (idx, info.clone())))
            .collect();
        if present.len() < 2 {
            continue;
        }

        let refreshed: Vec<(usize, FileInfo)> = present
            .into_iter()
            .map(|(idx, info)| (idx, info.refresh()))
            .collect();

        if refreshed.iter().all(|(_, info)| info.marks().is_sentinel()) {
            // No replica has real content yet; there is nothing to copy from.
            continue;
        }

        let mut authoritative: Option<(usize, FileInfo)> = None;
        for (idx, info) in &refreshed {
            if info.marks().is_sentinel() {
                continue;
            }
            authoritative = match authoritative {
                Some((_, ref a_info)) if info.marks().timestamp() > a_info.marks().timestamp() => {
                    Some((*idx, info.clone()))
                }
                Some(existing) => Some(existing),
                None => Some((*idx, info.clone())),
            };
        }
        let (authoritative_idx, authoritative_info) =
            authoritative.expect("not every replica is sentinel implies a non-sentinel entry exists");

        for (idx, info) in &refreshed {
            if idx == &authoritative_idx {
                continue;
            }
            if info.marks().fingerprint() == authoritative_info.marks().fingerprint() {
                continue;
            }
            jobs.push(ScheduledCopy {
                name: name.clone(),
                src_path: authoritative_info.path().to_string(),
                dest_index: *idx,
                dest_path: info.path().to_string(),
                authoritative_fingerprint: authoritative_info.marks().fingerprint().to_string(),
            });
        }
    }

    let mut report = UpdateReport {
        scheduled: jobs.len(),
        ..UpdateReport::default()
    };

    if jobs.is_empty() {
        return Ok(report);
    }

    let mut pool: workers::WorkerPool<(String, usize), ()> = workers::WorkerPool::new(worker_count);
    let mut job_info: HashMap<(String, usize), (String, String)> = HashMap::new();
    for job in jobs {
        job_info.insert(
            (job.name.clone(), job.dest_index),
            (job.dest_path.clone(), job.authoritative_fingerprint),
        );
        let label = (job.name, job.dest_index);
        let src_path = job.src_path;
        let dest_path = job.dest_path;
        pool.submit(label, move || {
            protocol::copy(&src_path, &dest_path).map_err(|err| err.to_string())
        })
        .map_err(ManagerError::from)?;
    }

    let _ = pool.process();
    for result in pool.drain_results() {
        let (name, dest_index) = result.label;
        let (dest_path, authoritative_fingerprint) = job_info
            .remove(&(name.clone(), dest_index))
            .expect("every drained result was submitted from job_info");
        match result.outcome {
            Ok(()) => {
                report.succeeded += 1;
                let marks = marks_after_copy(&dest_path, &authoritative_fingerprint);
                let info = FileInfo::from_fields(name, dest_path, marks)?;
                loaded[dest_index].table.replace(info);
                loaded[dest_index].changed = true;
            }
            Err(reason) => {
                report.failures.push(TransferFailure {
                    name,
                    destination: dest_path,
                    reason,
                });
            }
        }
    }

    for table in loaded.iter().filter(|t| t.changed) {
        table.table.write(&table.working_path)?;
        let classified = protocol::classify(&table.location);
        if !classified.is_local() {
            protocol::copy(&table.working_path.display().to_string(), &table.location)?;
        }
    }

    if report.scheduled > 0 && report.succeeded == 0 {
        return Err(ManagerError::AllTransfersFailed { report });
    }
    Ok(report)
}
