use crate::domain::a001_invoice::ui::details::{InvoiceDetailsPage, PaymentReturnPage};
use crate::system::pages::login::LoginPage;
use crate::system::pages::session_badge::SessionBadge;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="page">
            <h2>"Página no encontrada"</h2>
            <a href="/">"Ir al inicio"</a>
        </div>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <header class="top-header">
                <SessionBadge />
            </header>
            <main>
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/retorno-mp") view=PaymentReturnPage />
                    <Route path=path!("/facturas/:id") view=InvoiceDetailsPage />
                    <Route path=path!("/login") view=LoginPage />
                </Routes>
            </main>
        </Router>
    }
}
