//! Idle/Exporting state of the interface.

use uuid::Uuid;

use super::errors::ExportRejected;
use super::events::ExportPhase;
use super::job::ExportJob;

/// Whether an export is in flight.
///
/// Only one export may run at a time; controls are disabled while busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Exporting {
        job_id: Uuid,
        /// `None` until the worker reports its first phase.
        phase: Option<ExportPhase>,
    },
}

impl ExportState {
    /// Enter the exporting state for `job`.
    pub fn begin(&mut self, job: &ExportJob) -> Result<(), ExportRejected> {
        if self.is_busy() {
            return Err(ExportRejected::AlreadyRunning);
        }
        *self = ExportState::Exporting {
            job_id: job.id(),
            phase: None,
        };
        Ok(())
    }

    /// Record the worker's current phase. Ignored while idle.
    pub fn set_phase(&mut self, new_phase: ExportPhase) {
        if let ExportState::Exporting { phase, .. } = self {
            *phase = Some(new_phase);
        }
    }

    /// Return to idle, whatever the outcome.
    pub fn finish(&mut self) {
        *self = ExportState::Idle;
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ExportState::Exporting { .. })
    }

    pub fn phase(&self) -> Option<ExportPhase> {
        match self {
            ExportState::Exporting { phase, .. } => *phase,
            ExportState::Idle => None,
        }
    }

    pub fn job_id(&self) -> Option<Uuid> {
        match self {
            ExportState::Exporting { job_id, .. } => Some(*job_id),
            ExportState::Idle => None,
        }
    }
}
