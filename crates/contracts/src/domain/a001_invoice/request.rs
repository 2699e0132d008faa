use serde::{Deserialize, Serialize};

/// Body of `POST /api/facturas/desde-pago`.
///
/// `skip_stock` must stay `true`: stock was already decremented when the
/// order was placed, the backend must not decrement it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInvoiceFromPaymentDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrito_id: Option<i64>,
    pub skip_stock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_missing_fields() {
        let dto = CreateInvoiceFromPaymentDto {
            payment_id: None,
            external_reference: Some("abc123".into()),
            carrito_id: Some(12),
            skip_stock: true,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"external_reference":"abc123","carrito_id":12,"skip_stock":true})
        );
    }
}
