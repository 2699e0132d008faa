use leptos::prelude::*;
use thaw::*;

use super::view_model::{InvoiceReconcilerViewModel, Notice};
use crate::domain::a001_invoice::reconciler::{FlowMode, NoticeLevel, Phase};
use crate::shared::api_error::ErrorInfo;
use crate::shared::number_format::format_money;

const HOME_URL: &str = "/";
const CART_URL: &str = "/carrito";
const INVOICES_URL: &str = "/facturas";

fn notice_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "warning-box warning-box--info",
        NoticeLevel::Success => "warning-box warning-box--success",
        NoticeLevel::Warning => "warning-box warning-box--warning",
        NoticeLevel::Error => "warning-box warning-box--error",
    }
}

#[component]
pub fn InvoiceReconcilerView(mode: FlowMode) -> impl IntoView {
    let vm = InvoiceReconcilerViewModel::new(mode);

    let page_flag = vm.page_flag();
    on_cleanup(move || page_flag.cancel());

    // Start on mount
    Effect::new(move |_| vm.start());

    view! {
        <div class="page invoice-details">
            {move || vm.notice.get().map(|Notice { message, level }| view! {
                <div class=notice_class(level)>
                    <span class="warning-box__text">{message}</span>
                </div>
            })}

            {move || {
                let state = vm.state.get();
                match state.phase {
                    Phase::Loading | Phase::Fetching => view! {
                        <div class="invoice-details__status">"Cargando factura..."</div>
                    }.into_any(),
                    Phase::Submitting => view! {
                        <div class="invoice-details__status">
                            "Confirmando el pago y generando tu factura..."
                            <div class="invoice-details__attempt">
                                {format!("Intento {}/{}", state.attempts, vm.max_tries)}
                            </div>
                        </div>
                    }.into_any(),
                    Phase::Reloading { attempt, max } => view! {
                        <div class="invoice-details__status">
                            {format!("Recarga en progreso ({}/{})...", attempt, max)}
                        </div>
                    }.into_any(),
                    Phase::AlreadyProcessed => view! {
                        <div class="card invoice-details__card">
                            <h2>"Este pago ya fue procesado"</h2>
                            <p>"Puedes consultar la factura en tu listado de facturas."</p>
                            <Space>
                                <a class="btn" href=INVOICES_URL>"Mis facturas"</a>
                                <a class="btn" href=HOME_URL>"Ir al inicio"</a>
                            </Space>
                        </div>
                    }.into_any(),
                    Phase::NotApproved { status } => view! {
                        <div class="card invoice-details__card">
                            <h2>"El pago no fue aprobado"</h2>
                            <p>{format!("Estado reportado: {}", status.unwrap_or_else(|| "desconocido".to_string()))}</p>
                            <Space>
                                <a class="btn" href=CART_URL>"Volver al carrito"</a>
                                <a class="btn" href=HOME_URL>"Ir al inicio"</a>
                            </Space>
                        </div>
                    }.into_any(),
                    Phase::Success => match state.invoice {
                        Some(invoice) => view! {
                            <div class="card invoice-details__card">
                                <h2>{format!("Factura {}", invoice.display_number())}</h2>
                                <p class="invoice-details__total">
                                    {format_money(invoice.total, invoice.currency())}
                                </p>
                                <Space>
                                    <Button
                                        appearance=ButtonAppearance::Primary
                                        on_click=move |_| vm.download_pdf()
                                        disabled=vm.downloading
                                    >
                                        "Descargar PDF"
                                    </Button>
                                    <a class="btn" href=INVOICES_URL>"Mis facturas"</a>
                                    <a class="btn" href=HOME_URL>"Ir al inicio"</a>
                                </Space>
                            </div>
                        }.into_any(),
                        None => view! { <></> }.into_any(),
                    },
                    Phase::Failed => match state.error {
                        Some(err) => error_panel(err, vm),
                        None => view! { <></> }.into_any(),
                    },
                }
            }}
        </div>
    }
}

fn error_panel(err: ErrorInfo, vm: InvoiceReconcilerViewModel) -> AnyView {
    let raw = err.to_pretty_json();
    let summary = err.endpoint_summary();
    let status_line = match (err.status, err.status_text.clone()) {
        (Some(status), Some(text)) => format!("HTTP {} {}", status, text),
        (Some(status), None) => format!("HTTP {}", status),
        (None, _) => "Sin respuesta del servidor".to_string(),
    };
    let field_errors = err
        .field_errors
        .iter()
        .map(|(field, messages)| {
            let line = format!("{}: {}", field, messages.join(", "));
            view! { <li>{line}</li> }
        })
        .collect_view();

    view! {
        <div class="card invoice-details__error">
            <h2>"No pudimos generar tu factura"</h2>
            <div class="warning-box warning-box--error">
                <span class="warning-box__icon">"⚠"</span>
                <span class="warning-box__text">{err.short_message.clone()}</span>
            </div>
            <p class="invoice-details__http">{status_line}</p>
            <p class="invoice-details__endpoint">{summary}</p>
            <ul class="invoice-details__field-errors">{field_errors}</ul>
            <details>
                <summary>"Detalles técnicos"</summary>
                <pre class="invoice-details__raw">{raw}</pre>
            </details>
            <Space>
                <Button appearance=ButtonAppearance::Primary on_click=move |_| vm.retry_now()>
                    "Reintentar ahora"
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| vm.copy_error()>
                    "Copiar detalles"
                </Button>
                <a class="btn" href=CART_URL>"Ir al carrito"</a>
                <a class="btn" href=HOME_URL>"Ir al inicio"</a>
            </Space>
        </div>
    }
    .into_any()
}
