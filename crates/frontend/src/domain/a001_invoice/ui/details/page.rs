use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use super::view::InvoiceReconcilerView;
use crate::domain::a001_invoice::reconciler::{FlowMode, ReturnContext};
use crate::shared::api_utils::current_query;

/// Landing page of the payment gateway redirect
#[component]
pub fn PaymentReturnPage() -> impl IntoView {
    let ctx = ReturnContext::from_query(&current_query());
    view! { <InvoiceReconcilerView mode=FlowMode::Return(ctx) /> }
}

/// Invoice detail by id; without an id it behaves as a payment return
#[component]
pub fn InvoiceDetailsPage() -> impl IntoView {
    let params = use_params_map();
    let id = params
        .with_untracked(|p| p.get("id"))
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let mode = match id {
        Some(invoice_id) => FlowMode::View { invoice_id },
        None => FlowMode::Return(ReturnContext::from_query(&current_query())),
    };

    view! { <InvoiceReconcilerView mode=mode /> }
}
