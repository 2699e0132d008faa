use async_trait::async_trait;
use contracts::domain::a001_invoice::aggregate::Invoice;
use contracts::domain::a001_invoice::request::CreateInvoiceFromPaymentDto;

use super::reconciler::flow::InvoiceGateway;
use crate::shared::api_client::{ClientMode, ClientRouter};
use crate::shared::api_error::ErrorInfo;

fn invoice_path(id: &str) -> String {
    format!("/api/facturas/{}", urlencoding::encode(id))
}

/// Create the invoice for an approved payment (protected)
pub async fn create_invoice_from_payment(
    router: &ClientRouter,
    dto: &CreateInvoiceFromPaymentDto,
) -> Result<Invoice, ErrorInfo> {
    router
        .resolve_client(Some(ClientMode::Protected))
        .post_json("/api/facturas/desde-pago", dto)
        .await
}

/// Get invoice by ID (protected)
pub async fn get_invoice(router: &ClientRouter, id: &str) -> Result<Invoice, ErrorInfo> {
    router
        .resolve_client(Some(ClientMode::Protected))
        .get_json(&invoice_path(id))
        .await
}

/// Download the invoice PDF (protected)
pub async fn download_invoice_pdf(router: &ClientRouter, id: &str) -> Result<Vec<u8>, ErrorInfo> {
    router
        .resolve_client(Some(ClientMode::Protected))
        .get_bytes(&format!("{}/pdf", invoice_path(id)))
        .await
}

/// [`InvoiceGateway`] over the REST backend
pub struct HttpInvoiceGateway {
    router: ClientRouter,
}

impl HttpInvoiceGateway {
    pub fn new(router: ClientRouter) -> Self {
        Self { router }
    }
}

#[async_trait(?Send)]
impl InvoiceGateway for HttpInvoiceGateway {
    async fn create_from_payment(
        &self,
        body: &CreateInvoiceFromPaymentDto,
    ) -> Result<Invoice, ErrorInfo> {
        create_invoice_from_payment(&self.router, body).await
    }

    async fn fetch_invoice(&self, id: &str) -> Result<Invoice, ErrorInfo> {
        get_invoice(&self.router, id).await
    }
}
