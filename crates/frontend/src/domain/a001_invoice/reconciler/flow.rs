//! Payment-return reconciliation flow.
//!
//! Return mode turns a gateway redirect into an invoice: idempotency guard,
//! sequential submission attempts with a fixed delay on transient statuses,
//! then escalation to full page reloads counted in session storage. View
//! mode fetches an existing invoice and shares the reload escalation.
//!
//! A reload ends the in-memory flow. The next page load starts a fresh
//! [`Reconciler`] that only sees what was persisted (marker and counter).

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::a001_invoice::aggregate::Invoice;
use contracts::domain::a001_invoice::request::CreateInvoiceFromPaymentDto;

use super::return_context::ReturnContext;
use super::state::{Phase, ReconciliationState};
use crate::shared::api_error::ErrorInfo;
use crate::shared::config::ReconcilerConfig;
use crate::shared::storage::KeyValueStore;

const FIRED_VALUE: &str = "1";

/// Network operations the flow depends on
#[async_trait(?Send)]
pub trait InvoiceGateway {
    async fn create_from_payment(
        &self,
        body: &CreateInvoiceFromPaymentDto,
    ) -> Result<Invoice, ErrorInfo>;

    async fn fetch_invoice(&self, id: &str) -> Result<Invoice, ErrorInfo>;
}

#[async_trait(?Send)]
pub trait Scheduler {
    async fn sleep(&self, ms: u32);
}

pub trait PageControl {
    /// Full navigation reload of the current page
    fn reload(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

pub trait Notifier {
    fn notify(&self, message: &str, level: NoticeLevel);
}

/// Teardown flag of one flow instance.
///
/// A child flag also reports cancelled once its parent is cancelled, so a
/// page can cancel every run it started with one call.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    own: Arc<AtomicBool>,
    parent: Option<Arc<AtomicBool>>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            own: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::clone(&self.own)),
        }
    }

    pub fn cancel(&self) {
        self.own.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.own.load(Ordering::SeqCst)
            || self
                .parent
                .as_ref()
                .map(|p| p.load(Ordering::SeqCst))
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_tries: u32,
    pub retry_delay_ms: u32,
    pub reload_max: u32,
    pub reload_delay_ms: u32,
}

impl From<&ReconcilerConfig> for RetryPolicy {
    fn from(cfg: &ReconcilerConfig) -> Self {
        Self {
            max_tries: cfg.max_tries.max(1),
            retry_delay_ms: cfg.retry_delay_ms,
            reload_max: cfg.reload_max,
            reload_delay_ms: cfg.reload_delay_ms,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_tries: 4,
            retry_delay_ms: 1500,
            reload_max: 3,
            reload_delay_ms: 2000,
        }
    }
}

/// Entry point, chosen once per page load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowMode {
    View { invoice_id: String },
    Return(ReturnContext),
}

pub fn fired_key(key: &str) -> String {
    format!("retorno_mp:fired:{}", key)
}

pub fn return_reload_key(key: &str) -> String {
    format!("retorno_mp:reload:{}", key)
}

pub fn view_reload_key(invoice_id: &str) -> String {
    format!("factura:view:reload:{}", invoice_id)
}

/// Stored reload count; missing or garbage values read as 0
pub fn read_reload_count(store: &dyn KeyValueStore, key: &str) -> u32 {
    store
        .get(key)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

pub struct Collaborators {
    pub gateway: Rc<dyn InvoiceGateway>,
    pub durable: Rc<dyn KeyValueStore>,
    pub session: Rc<dyn KeyValueStore>,
    pub scheduler: Rc<dyn Scheduler>,
    pub page: Rc<dyn PageControl>,
    pub notifier: Rc<dyn Notifier>,
}

pub struct Reconciler {
    deps: Collaborators,
    policy: RetryPolicy,
    cancel: CancelFlag,
    state: ReconciliationState,
    on_change: Box<dyn Fn(&ReconciliationState)>,
}

impl Reconciler {
    pub fn new(
        deps: Collaborators,
        policy: RetryPolicy,
        cancel: CancelFlag,
        on_change: impl Fn(&ReconciliationState) + 'static,
    ) -> Self {
        Self {
            deps,
            policy,
            cancel,
            state: ReconciliationState::new(),
            on_change: Box::new(on_change),
        }
    }

    /// Drive the flow to a terminal state, a scheduled reload or teardown.
    /// Returns the last published state.
    pub async fn run(mut self, mode: FlowMode) -> ReconciliationState {
        match mode {
            FlowMode::View { invoice_id } => self.run_view(&invoice_id).await,
            FlowMode::Return(ctx) => self.run_return(&ctx).await,
        }
        self.state
    }

    /// Apply and publish a mutation unless the flow was torn down
    fn transition(&mut self, mutate: impl FnOnce(&mut ReconciliationState)) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        mutate(&mut self.state);
        (self.on_change)(&self.state);
        true
    }

    fn notify(&self, message: &str, level: NoticeLevel) {
        if !self.cancel.is_cancelled() {
            self.deps.notifier.notify(message, level);
        }
    }

    async fn run_return(&mut self, ctx: &ReturnContext) {
        let key = ctx.idempotency_key();
        if ctx.debug {
            log::info!("payment return {:?}, idempotency key {}", ctx, key);
        }

        if self.deps.durable.get(&fired_key(&key)).is_some() {
            log::info!("payment {} was already submitted, nothing to do", key);
            if self.cancel.is_cancelled() {
                return;
            }
            self.deps.session.set(&return_reload_key(&key), "0");
            self.transition(|s| {
                s.phase = Phase::AlreadyProcessed;
                s.loading = false;
                s.ok = true;
            });
            return;
        }

        if !ctx.is_approved() {
            log::info!("payment {} not approved (status {:?})", key, ctx.status);
            let status = ctx.status.clone();
            self.transition(move |s| {
                s.phase = Phase::NotApproved { status };
                s.loading = false;
                s.ok = false;
            });
            return;
        }

        let body = ctx.invoice_request();
        let reload_key = return_reload_key(&key);
        let mut attempt = 0;

        loop {
            attempt += 1;
            if !self.transition(|s| {
                s.phase = Phase::Submitting;
                s.attempts = attempt;
            }) {
                return;
            }
            log::debug!(
                "create invoice for {}: attempt {}/{}",
                key,
                attempt,
                self.policy.max_tries
            );

            let result = self.deps.gateway.create_from_payment(&body).await;
            if self.cancel.is_cancelled() {
                return;
            }

            match result {
                Ok(invoice) => {
                    self.deps.durable.set(&fired_key(&key), FIRED_VALUE);
                    self.deps.session.set(&reload_key, "0");
                    let number = invoice.display_number();
                    log::info!("invoice {} created for payment {}", number, key);
                    self.succeed(invoice);
                    self.notify(&format!("Factura {} generada", number), NoticeLevel::Success);
                    return;
                }
                Err(err) if err.is_decode_error() => {
                    // accepted upstream, so the payment must not be resubmitted
                    self.deps.durable.set(&fired_key(&key), FIRED_VALUE);
                    self.deps.session.set(&reload_key, "0");
                    log::warn!("invoice for {} was created but the response is unreadable", key);
                    self.escalate(&reload_key, err).await;
                    return;
                }
                Err(err) if attempt < self.policy.max_tries && err.is_transient() => {
                    log::warn!(
                        "create invoice for {} failed ({}), retrying in {} ms",
                        key,
                        err.endpoint_summary(),
                        self.policy.retry_delay_ms
                    );
                    self.deps.scheduler.sleep(self.policy.retry_delay_ms).await;
                    if self.cancel.is_cancelled() {
                        return;
                    }
                }
                Err(err) => {
                    self.escalate(&reload_key, err).await;
                    return;
                }
            }
        }
    }

    async fn run_view(&mut self, invoice_id: &str) {
        let reload_key = view_reload_key(invoice_id);
        if !self.transition(|s| {
            s.phase = Phase::Fetching;
            s.attempts = 1;
        }) {
            return;
        }

        let result = self.deps.gateway.fetch_invoice(invoice_id).await;
        if self.cancel.is_cancelled() {
            return;
        }

        match result {
            Ok(invoice) => {
                self.deps.session.set(&reload_key, "0");
                self.succeed(invoice);
            }
            Err(err) => self.escalate(&reload_key, err).await,
        }
    }

    fn succeed(&mut self, invoice: Invoice) {
        self.transition(move |s| {
            s.phase = Phase::Success;
            s.loading = false;
            s.ok = true;
            s.error = None;
            s.invoice = Some(invoice);
            s.reloads = 0;
        });
    }

    /// Schedule a full reload while the budget lasts, otherwise fail for good
    async fn escalate(&mut self, reload_key: &str, err: ErrorInfo) {
        if self.cancel.is_cancelled() {
            return;
        }

        let max = self.policy.reload_max;
        let count = read_reload_count(self.deps.session.as_ref(), reload_key).min(max);

        if err.is_transient() && count < max {
            let next = count + 1;
            self.deps.session.set(reload_key, &next.to_string());
            log::warn!(
                "{} still failing ({}), reloading page {}/{}",
                reload_key,
                err.endpoint_summary(),
                next,
                max
            );
            if !self.transition(move |s| {
                s.phase = Phase::Reloading { attempt: next, max };
                s.loading = true;
                s.ok = false;
                s.error = Some(err);
                s.reloads = next;
            }) {
                return;
            }
            self.notify(
                &format!("Reintentando, recarga {}/{}", next, max),
                NoticeLevel::Warning,
            );

            self.deps.scheduler.sleep(self.policy.reload_delay_ms).await;
            if self.cancel.is_cancelled() {
                return;
            }
            self.deps.page.reload();
        } else {
            log::error!(
                "{} gave up: {} ({})",
                reload_key,
                err,
                err.endpoint_summary()
            );
            let message = err.short_message.clone();
            if self.transition(move |s| {
                s.phase = Phase::Failed;
                s.loading = false;
                s.ok = false;
                s.error = Some(err);
                s.reloads = count;
            }) {
                self.notify(&message, NoticeLevel::Error);
            }
        }
    }
}
