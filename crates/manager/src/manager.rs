//! [`Manager`]: the synchronization engine over a [`ManagerRegistration`].

use std::num::NonZeroUsize;

use table::Table;

use crate::error::ManagerError;
use crate::reconcile::{reconcile, UpdateReport};
use crate::registration::ManagerRegistration;

/// Default number of parallel workers used by [`Manager::update`].
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// The synchronization engine: holds a [`ManagerRegistration`] and a worker
/// count, and re-reads tables from their registered locations on every
/// operation. The manager owns no table state between calls.
#[derive(Clone, Debug)]
pub struct Manager {
    registration: ManagerRegistration,
    worker_count: NonZeroUsize,
}

impl Manager {
    /// Creates a manager over `registration` with the default worker count.
    #[must_use]
    pub fn new(registration: ManagerRegistration) -> Self {
        Self {
            registration,
            worker_count: NonZeroUsize::new(DEFAULT_WORKER_COUNT)
                .expect("DEFAULT_WORKER_COUNT is nonzero"),
        }
    }

    /// Creates a manager over `registration` with an explicit worker count.
    #[must_use]
    pub fn with_worker_count(registration: ManagerRegistration, worker_count: NonZeroUsize) -> Self {
        Self {
            registration,
            worker_count,
        }
    }

    /// The underlying registration.
    #[must_use]
    pub fn registration(&self) -> &ManagerRegistration {
        &self.registration
    }

    /// Reads and returns the table at the first registered location
    /// reachable on this host.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoLocalReplica`] if no registered location
    /// resolves under [`protocol::available_local_path`], or a
    /// [`ManagerError::Table`] if the resolved table fails to parse.
    pub fn available_table(&self) -> Result<Table, ManagerError> {
        for location in self.registration.locations() {
            if let Some(local) = protocol::available_local_path(location) {
                return Ok(Table::read(local)?);
            }
        }
        Err(ManagerError::NoLocalReplica)
    }

    /// Reconciles every registered table: computes the authoritative
    /// replica for each shared entry name and copies it to every
    /// out-of-sync replica, writing back any table that changed.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::AllTransfersFailed`] if at least one copy was
    /// scheduled and all of them failed. Partial failures are reported in
    /// the returned [`UpdateReport`] without being raised.
    pub fn update(&self) -> Result<UpdateReport, ManagerError> {
        reconcile(&self.registration, self.worker_count)
    }
}
