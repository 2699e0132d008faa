//! Gateway redirect parameters.

use contracts::domain::a001_invoice::request::CreateInvoiceFromPaymentDto;
use serde::Deserialize;

/// Key used when the redirect carries neither reference nor payment id
pub const UNKNOWN_KEY: &str = "unknown";

/// Raw query as sent by the gateway. Both spellings of a parameter may be
/// present at the same time, so they are separate fields, not aliases.
#[derive(Debug, Default, Deserialize)]
struct RawReturnQuery {
    status: Option<String>,
    collection_status: Option<String>,
    payment_status: Option<String>,
    payment_id: Option<String>,
    collection_id: Option<String>,
    external_reference: Option<String>,
    #[serde(rename = "carritoId")]
    carrito_id_camel: Option<String>,
    carrito_id: Option<String>,
    preference_id: Option<String>,
    debug: Option<String>,
}

/// Parameters of one return from the payment gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnContext {
    pub status: Option<String>,
    pub payment_id: Option<String>,
    pub external_reference: Option<String>,
    pub cart_id: Option<String>,
    pub preference_id: Option<String>,
    pub payment_status: Option<String>,
    pub debug: bool,
}

/// Query names read into [`RawReturnQuery`]
const KNOWN_KEYS: [&str; 10] = [
    "status",
    "collection_status",
    "payment_status",
    "payment_id",
    "collection_id",
    "external_reference",
    "carritoId",
    "carrito_id",
    "preference_id",
    "debug",
];

/// Keep only the first occurrence of each known parameter. Other keys are
/// dropped, so a repeated or malformed unrelated key cannot fail the parse.
fn known_pairs(query: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    let mut kept: Vec<&str> = Vec::new();
    for pair in query.split('&') {
        let raw_name = pair.split('=').next().unwrap_or_default();
        let name = urlencoding::decode(raw_name)
            .map(|n| n.into_owned())
            .unwrap_or_else(|_| raw_name.to_string());
        if let Some(known) = KNOWN_KEYS.iter().find(|k| **k == name) {
            if !seen.contains(known) {
                seen.push(known);
                kept.push(pair);
            }
        }
    }
    kept.join("&")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "null" && v != "undefined")
}

impl ReturnContext {
    /// Parse a query string (`?a=1&b=2` or `a=1&b=2`). The first value of a
    /// repeated parameter wins. Unreadable input yields an empty context,
    /// which is then handled as "not approved".
    pub fn from_query(query: &str) -> Self {
        let query = known_pairs(query.trim_start_matches('?'));
        let raw: RawReturnQuery = match serde_qs::from_str(&query) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("return query could not be parsed: {}", e);
                RawReturnQuery::default()
            }
        };

        let payment_status = non_blank(raw.payment_status);
        Self {
            status: non_blank(raw.status)
                .or_else(|| non_blank(raw.collection_status))
                .or_else(|| payment_status.clone()),
            payment_id: non_blank(raw.payment_id).or_else(|| non_blank(raw.collection_id)),
            external_reference: non_blank(raw.external_reference),
            cart_id: non_blank(raw.carrito_id_camel).or_else(|| non_blank(raw.carrito_id)),
            preference_id: non_blank(raw.preference_id),
            payment_status,
            debug: raw.debug.as_deref() == Some("1"),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("approved"))
            .unwrap_or(false)
    }

    /// `external_reference`, else `payment_id`, else [`UNKNOWN_KEY`]
    pub fn idempotency_key(&self) -> String {
        self.external_reference
            .clone()
            .or_else(|| self.payment_id.clone())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string())
    }

    /// Cart id as a number; anything non-numeric is dropped
    pub fn cart_id_number(&self) -> Option<i64> {
        self.cart_id.as_deref().and_then(|c| c.parse::<i64>().ok())
    }

    pub fn invoice_request(&self) -> CreateInvoiceFromPaymentDto {
        CreateInvoiceFromPaymentDto {
            payment_id: self.payment_id.clone(),
            external_reference: self.external_reference.clone(),
            carrito_id: self.cart_id_number(),
            skip_stock: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gateway_redirect() {
        let ctx = ReturnContext::from_query(
            "?collection_id=991&collection_status=approved&payment_id=991&status=approved\
             &external_reference=abc123&payment_type=credit_card&preference_id=pref-1&carritoId=42",
        );
        assert_eq!(ctx.status.as_deref(), Some("approved"));
        assert_eq!(ctx.payment_id.as_deref(), Some("991"));
        assert_eq!(ctx.external_reference.as_deref(), Some("abc123"));
        assert_eq!(ctx.cart_id_number(), Some(42));
        assert_eq!(ctx.preference_id.as_deref(), Some("pref-1"));
        assert!(ctx.is_approved());
        assert!(!ctx.debug);
        assert_eq!(ctx.idempotency_key(), "abc123");
    }

    #[test]
    fn falls_back_to_alternate_names() {
        let ctx = ReturnContext::from_query("collection_status=APPROVED&collection_id=55&carrito_id=7&debug=1");
        assert!(ctx.is_approved());
        assert_eq!(ctx.payment_id.as_deref(), Some("55"));
        assert_eq!(ctx.idempotency_key(), "55");
        assert_eq!(ctx.cart_id_number(), Some(7));
        assert!(ctx.debug);
    }

    #[test]
    fn missing_identifiers_use_unknown_key() {
        let ctx = ReturnContext::from_query("status=rejected&external_reference=null");
        assert!(!ctx.is_approved());
        assert_eq!(ctx.external_reference, None);
        assert_eq!(ctx.idempotency_key(), UNKNOWN_KEY);

        let empty = ReturnContext::from_query("");
        assert_eq!(empty, ReturnContext::default());
        assert!(!empty.is_approved());
    }

    #[test]
    fn repeated_keys_keep_first_value() {
        let ctx = ReturnContext::from_query(
            "status=approved&external_reference=abc&payment_id=1&payment_id=2",
        );
        assert!(ctx.is_approved());
        assert_eq!(ctx.payment_id.as_deref(), Some("1"));
        assert_eq!(ctx.external_reference.as_deref(), Some("abc"));
        assert_eq!(ctx.idempotency_key(), "abc");
    }

    #[test]
    fn unrelated_keys_do_not_break_parsing() {
        let ctx = ReturnContext::from_query(
            "?from=cart&from=checkout&foo[=x&foo[bar]=1&status=approved\
             &external_reference=ord%2D9&merchant_order_id=5",
        );
        assert!(ctx.is_approved());
        assert_eq!(ctx.external_reference.as_deref(), Some("ord-9"));
    }

    #[test]
    fn request_always_skips_stock() {
        let ctx = ReturnContext::from_query("status=approved&payment_id=1&carritoId=abc");
        let dto = ctx.invoice_request();
        assert!(dto.skip_stock);
        assert_eq!(dto.carrito_id, None);
        assert_eq!(dto.payment_id.as_deref(), Some("1"));
    }
}
