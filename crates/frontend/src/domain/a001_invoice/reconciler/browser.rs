//! Browser-backed collaborators of the reconciler.

use std::rc::Rc;

use async_trait::async_trait;

use super::flow::{Collaborators, Notifier, PageControl, Scheduler};
use crate::domain::a001_invoice::api::HttpInvoiceGateway;
use crate::shared::api_client::ClientRouter;
use crate::shared::storage::{durable_store, session_store};

/// Delays on the event loop via `setTimeout`
pub struct TimerScheduler;

#[async_trait(?Send)]
impl Scheduler for TimerScheduler {
    async fn sleep(&self, ms: u32) {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }
}

/// `window.location.reload()`
pub struct BrowserPage;

impl PageControl for BrowserPage {
    fn reload(&self) {
        match web_sys::window() {
            Some(window) => {
                if let Err(e) = window.location().reload() {
                    log::error!("page reload failed: {:?}", e);
                }
            }
            None => log::error!("page reload requested without a window"),
        }
    }
}

/// Wire the flow to the real backend, storage and timers
pub fn browser_collaborators(
    router: ClientRouter,
    notifier: Rc<dyn Notifier>,
) -> Collaborators {
    Collaborators {
        gateway: Rc::new(HttpInvoiceGateway::new(router)),
        durable: durable_store(),
        session: session_store(),
        scheduler: Rc::new(TimerScheduler),
        page: Rc::new(BrowserPage),
        notifier,
    }
}
