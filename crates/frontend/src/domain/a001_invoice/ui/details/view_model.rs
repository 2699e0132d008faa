use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_invoice::api;
use crate::domain::a001_invoice::reconciler::browser::browser_collaborators;
use crate::domain::a001_invoice::reconciler::{
    CancelFlag, FlowMode, NoticeLevel, Notifier, Reconciler, ReconciliationState, RetryPolicy,
};
use crate::shared::api_client::ClientRouter;
use crate::shared::clipboard::copy_to_clipboard_with_callback;
use crate::shared::config::load_config;
use crate::shared::export::{pdf_file_name, save_bytes};

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

/// Notifier rendering into the page's notice banner
struct SignalNotifier {
    notice: RwSignal<Option<Notice>>,
}

impl Notifier for SignalNotifier {
    fn notify(&self, message: &str, level: NoticeLevel) {
        self.notice.set(Some(Notice {
            message: message.to_string(),
            level,
        }));
    }
}

/// ViewModel of the invoice page (payment return and invoice detail)
#[derive(Clone, Copy)]
pub struct InvoiceReconcilerViewModel {
    pub state: RwSignal<ReconciliationState>,
    pub notice: RwSignal<Option<Notice>>,
    pub downloading: RwSignal<bool>,
    pub max_tries: u32,
    mode: StoredValue<FlowMode>,
    page_flag: StoredValue<CancelFlag>,
    run_flag: StoredValue<CancelFlag>,
}

impl InvoiceReconcilerViewModel {
    pub fn new(mode: FlowMode) -> Self {
        let page_flag = CancelFlag::new();
        let run_flag = page_flag.child();
        Self {
            state: RwSignal::new(ReconciliationState::new()),
            notice: RwSignal::new(None),
            downloading: RwSignal::new(false),
            max_tries: RetryPolicy::from(&load_config().reconciler).max_tries,
            mode: StoredValue::new(mode),
            page_flag: StoredValue::new(page_flag),
            run_flag: StoredValue::new(run_flag),
        }
    }

    /// Flag cancelled when the page goes away
    pub fn page_flag(&self) -> CancelFlag {
        self.page_flag.get_value()
    }

    /// Start a fresh flow instance, abandoning any previous one
    pub fn start(&self) {
        self.run_flag.get_value().cancel();
        let flag = self.page_flag.get_value().child();
        self.run_flag.set_value(flag.clone());

        self.state.set(ReconciliationState::new());
        self.notice.set(None);

        let config = load_config();
        let policy = RetryPolicy::from(&config.reconciler);
        let router = ClientRouter::from_browser(&config);
        let mode = self.mode.get_value();
        let state = self.state;
        let notice = self.notice;

        spawn_local(async move {
            let deps = browser_collaborators(router, Rc::new(SignalNotifier { notice }));
            let reconciler = Reconciler::new(deps, policy, flag, move |s: &ReconciliationState| {
                state.set(s.clone())
            });
            reconciler.run(mode).await;
        });
    }

    /// Manual "retry now" from the error panel
    pub fn retry_now(&self) {
        log::info!("manual retry requested");
        self.start();
    }

    pub fn copy_error(&self) {
        let Some(err) = self.state.with_untracked(|s| s.error.clone()) else {
            return;
        };
        let notice = self.notice;
        copy_to_clipboard_with_callback(&err.to_pretty_json(), move || {
            notice.set(Some(Notice {
                message: "Detalles copiados al portapapeles".to_string(),
                level: NoticeLevel::Info,
            }));
        });
    }

    pub fn download_pdf(&self) {
        let Some(invoice) = self.state.with_untracked(|s| s.invoice.clone()) else {
            return;
        };
        let downloading = self.downloading;
        let notice = self.notice;
        downloading.set(true);

        spawn_local(async move {
            let router = ClientRouter::from_browser(&load_config());
            let result = api::download_invoice_pdf(&router, &invoice.id.to_string())
                .await
                .map_err(|e| e.to_string())
                .and_then(|bytes| {
                    save_bytes(
                        &bytes,
                        &pdf_file_name(&invoice.display_number()),
                        "application/pdf",
                    )
                });
            if let Err(e) = result {
                log::error!("invoice pdf download failed: {}", e);
                notice.set(Some(Notice {
                    message: format!("No se pudo descargar el PDF: {}", e),
                    level: NoticeLevel::Error,
                }));
            }
            downloading.set(false);
        });
    }
}
