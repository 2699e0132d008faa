use contracts::domain::a001_invoice::aggregate::Invoice;

use crate::shared::api_error::ErrorInfo;

/// Displayed stage of the flow
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Mounted, nothing dispatched yet
    Loading,
    /// Create-from-payment attempt in flight (or waiting for the next one)
    Submitting,
    /// Invoice fetch in flight (view mode)
    Fetching,
    /// Idempotency marker found, nothing was sent
    AlreadyProcessed,
    /// Gateway reported a status other than "approved"
    NotApproved { status: Option<String> },
    Success,
    /// A full page reload is scheduled
    Reloading { attempt: u32, max: u32 },
    /// Terminal failure, only manual recovery remains
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationState {
    pub phase: Phase,
    pub loading: bool,
    pub ok: bool,
    pub error: Option<ErrorInfo>,
    pub invoice: Option<Invoice>,
    pub attempts: u32,
    pub reloads: u32,
}

impl ReconciliationState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            loading: true,
            ok: false,
            error: None,
            invoice: None,
            attempts: 0,
            reloads: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            Phase::AlreadyProcessed | Phase::NotApproved { .. } | Phase::Success | Phase::Failed
        )
    }
}

impl Default for ReconciliationState {
    fn default() -> Self {
        Self::new()
    }
}
