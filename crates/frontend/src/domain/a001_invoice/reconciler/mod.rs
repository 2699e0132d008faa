//! Reconciliation of payment-gateway returns into invoices.

pub mod browser;
pub mod flow;
pub mod return_context;
pub mod state;

pub use flow::{CancelFlag, FlowMode, NoticeLevel, Notifier, Reconciler, RetryPolicy};
pub use return_context::ReturnContext;
pub use state::{Phase, ReconciliationState};
