use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};

use crate::core::ImportError;

use super::orchestrator::run_import;
use super::reconcile::ImportBatchResult;
use super::request::{DocumentFile, ImportBatchRequest};
use super::transport::AuditTransport;

/// What happened to a submission once its response arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The result was applied to the session and is now displayed.
    Applied(Arc<ImportBatchResult>),
    /// The company changed or the view was left while the request was in
    /// flight; the response was dropped without touching the session.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveCompany {
    company_id: String,
    generation: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    active: Option<ActiveCompany>,
    next_generation: u64,
    in_flight: HashSet<String>,
    selected: Vec<DocumentFile>,
    displayed: Option<Arc<ImportBatchResult>>,
}

/// Import view state for one user: the active company, the selected files,
/// the last displayed result and which companies have a submission in flight.
///
/// Each activation of a company starts a new generation. A submission
/// remembers the generation it started in and its result is only applied
/// while that generation is still active.
pub struct ImportSession<T> {
    transport: T,
    state: Mutex<SessionState>,
}

impl<T: AuditTransport> ImportSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Make `company_id` the active company, starting a fresh view.
    /// Returns the new generation.
    pub fn activate_company(&self, company_id: impl Into<String>) -> u64 {
        let mut state = self.lock();
        state.next_generation += 1;
        let generation = state.next_generation;
        state.active = Some(ActiveCompany {
            company_id: company_id.into(),
            generation,
        });
        state.selected.clear();
        state.displayed = None;
        generation
    }

    /// Leave the import view. Responses still in flight will be discarded.
    pub fn leave(&self) {
        let mut state = self.lock();
        state.active = None;
        state.selected.clear();
        state.displayed = None;
    }

    pub fn active_company(&self) -> Option<String> {
        self.lock().active.as_ref().map(|a| a.company_id.clone())
    }

    /// Replace the file selection.
    pub fn select_files(&self, files: Vec<DocumentFile>) {
        self.lock().selected = files;
    }

    pub fn selected_file_names(&self) -> Vec<String> {
        self.lock()
            .selected
            .iter()
            .map(|f| f.file_name.clone())
            .collect()
    }

    /// Result of the last applied submission in the current view.
    pub fn displayed_result(&self) -> Option<Arc<ImportBatchResult>> {
        self.lock().displayed.clone()
    }

    pub fn is_in_flight(&self, company_id: &str) -> bool {
        self.lock().in_flight.contains(company_id)
    }

    /// Submit the selected files for the active company.
    ///
    /// Local validation runs before anything is marked in flight, so a
    /// rejected selection never reaches the transport. On success the
    /// selection is cleared and the result displayed; on failure the
    /// selection is kept for another attempt.
    pub async fn submit(&self) -> Result<SubmitOutcome, ImportError> {
        let (request, ticket) = {
            let mut state = self.lock();
            let ticket = state.active.clone().ok_or(ImportError::NoActiveCompany)?;
            let request =
                ImportBatchRequest::new(ticket.company_id.clone(), state.selected.clone())?;
            if !state.in_flight.insert(ticket.company_id.clone()) {
                return Err(ImportError::ImportAlreadyInProgress(ticket.company_id));
            }
            (request, ticket)
        };

        let guard = InFlightGuard::new(&self.state, &ticket.company_id);
        let result = run_import(&self.transport, &request).await;

        let mut state = self.lock();
        guard.release(&mut state);
        if state.active.as_ref() != Some(&ticket) {
            warn!(
                company_id = %ticket.company_id,
                generation = ticket.generation,
                "discarding import result for inactive view"
            );
            if let Err(err) = &result {
                if err.is_defect() {
                    error!(company_id = %ticket.company_id, %err, "discarded import failed");
                }
            }
            return Ok(SubmitOutcome::Discarded);
        }

        let result = Arc::new(result?);
        state.selected.clear();
        state.displayed = Some(Arc::clone(&result));
        info!(
            company_id = %ticket.company_id,
            total = result.total_files(),
            succeeded = result.succeeded_count(),
            failed = result.failed_count(),
            "import applied"
        );
        Ok(SubmitOutcome::Applied(result))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds a company's in-flight mark for the duration of a submission.
///
/// The normal path calls [`release`](Self::release) inside the same critical
/// section that applies or discards the result. Dropping an unreleased guard
/// clears the mark too, which covers a submitting future cancelled
/// mid-request.
struct InFlightGuard<'a> {
    state: &'a Mutex<SessionState>,
    company_id: &'a str,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(state: &'a Mutex<SessionState>, company_id: &'a str) -> Self {
        Self {
            state,
            company_id,
            armed: true,
        }
    }

    /// Clear the mark under a lock the caller already holds.
    fn release(mut self, state: &mut SessionState) {
        state.in_flight.remove(self.company_id);
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(self.company_id);
    }
}
