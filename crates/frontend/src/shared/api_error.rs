//! Normalized description of a failed HTTP call.
//!
//! Every failure is turned into an [`ErrorInfo`] at the call site. The same
//! value drives retry classification and the diagnostic panel.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// HTTP statuses that are retried automatically
pub const TRANSIENT_STATUSES: [u16; 6] = [404, 409, 429, 500, 502, 503];

const DECODE_ERROR_CODE: &str = "decode_error";

pub fn is_transient_status(status: u16) -> bool {
    TRANSIENT_STATUSES.contains(&status)
}

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{short_message}")]
pub struct ErrorInfo {
    pub short_message: String,
    /// `None` for network-level failures (offline, CORS, timeout)
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub code: Option<String>,
    pub method: String,
    pub url: String,
    pub request_payload: Option<Value>,
    pub response_data: Option<Value>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ErrorInfo {
    /// Build from a non-2xx response
    pub fn from_response(
        method: &str,
        url: &str,
        status: u16,
        status_text: &str,
        body: &str,
        request_payload: Option<Value>,
    ) -> Self {
        let response_data = parse_body(body);
        let status_text = Some(status_text.to_string()).filter(|s| !s.is_empty());

        let short_message = response_data
            .as_ref()
            .and_then(message_from_body)
            .or_else(|| status_text.clone())
            .unwrap_or_else(|| format!("HTTP {}", status));

        let code = response_data.as_ref().and_then(|d| match d.get("code") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        });

        let field_errors = response_data
            .as_ref()
            .map(field_errors_from_body)
            .unwrap_or_default();

        Self {
            short_message,
            status: Some(status),
            status_text,
            code,
            method: method.to_string(),
            url: url.to_string(),
            request_payload,
            response_data,
            field_errors,
        }
    }

    /// Build from a transport failure, there is no status
    pub fn network(
        method: &str,
        url: &str,
        request_payload: Option<Value>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self {
            short_message: format!("Error de red: {}", cause),
            status: None,
            status_text: None,
            code: None,
            method: method.to_string(),
            url: url.to_string(),
            request_payload,
            response_data: None,
            field_errors: BTreeMap::new(),
        }
    }

    /// The server answered 2xx but the body could not be decoded.
    /// The request itself was accepted, so callers must not resubmit it.
    pub fn decode(method: &str, url: &str, cause: impl std::fmt::Display) -> Self {
        Self {
            short_message: format!("Respuesta inválida del servidor: {}", cause),
            status: None,
            status_text: None,
            code: Some(DECODE_ERROR_CODE.to_string()),
            method: method.to_string(),
            url: url.to_string(),
            request_payload: None,
            response_data: None,
            field_errors: BTreeMap::new(),
        }
    }

    /// True for a 2xx response whose body did not decode
    pub fn is_decode_error(&self) -> bool {
        self.status.is_none() && self.code.as_deref() == Some(DECODE_ERROR_CODE)
    }

    pub fn is_transient(&self) -> bool {
        self.status.map(is_transient_status).unwrap_or(false)
    }

    /// "POST /api/facturas/desde-pago → 500"
    pub fn endpoint_summary(&self) -> String {
        match self.status {
            Some(status) => format!("{} {} → {}", self.method, self.url, status),
            None => format!("{} {} → sin respuesta", self.method, self.url),
        }
    }

    /// Pretty JSON used by the "copy details" action
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.short_message.clone())
    }
}

fn parse_body(body: &str) -> Option<Value> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string())))
}

fn message_from_body(body: &Value) -> Option<String> {
    ["message", "error", "detail"]
        .iter()
        .filter_map(|k| body.get(*k))
        .find_map(|v| v.as_str().map(str::to_string))
        .filter(|s| !s.trim().is_empty())
}

// Validation errors come as {"errors": {"field": ["msg", ...]}}; a bare
// string per field is accepted too.
fn field_errors_from_body(body: &Value) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    if let Some(Value::Object(errors)) = body.get("errors") {
        for (field, messages) in errors {
            let list = match messages {
                Value::Array(items) => items
                    .iter()
                    .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
                    .collect(),
                Value::String(s) => vec![s.clone()],
                other => vec![other.to_string()],
            };
            out.insert(field.clone(), list);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_set() {
        for s in [404, 409, 429, 500, 502, 503] {
            assert!(is_transient_status(s), "{} should be transient", s);
        }
        for s in [400, 401, 403, 422, 504] {
            assert!(!is_transient_status(s), "{} should not be transient", s);
        }
    }

    #[test]
    fn extracts_message_code_and_field_errors() {
        let body = r#"{"message":"Datos inválidos","code":"E_VALIDATION","errors":{"carrito_id":["requerido"],"payment_id":"vacío"}}"#;
        let err = ErrorInfo::from_response(
            "POST",
            "http://h:3000/api/facturas/desde-pago",
            422,
            "Unprocessable Entity",
            body,
            Some(serde_json::json!({"skip_stock": true})),
        );
        assert_eq!(err.short_message, "Datos inválidos");
        assert_eq!(err.code.as_deref(), Some("E_VALIDATION"));
        assert_eq!(err.field_errors["carrito_id"], vec!["requerido".to_string()]);
        assert_eq!(err.field_errors["payment_id"], vec!["vacío".to_string()]);
        assert!(!err.is_transient());
        assert_eq!(
            err.endpoint_summary(),
            "POST http://h:3000/api/facturas/desde-pago → 422"
        );
    }

    #[test]
    fn falls_back_to_status_text_for_html_bodies() {
        let err = ErrorInfo::from_response("GET", "/x", 502, "Bad Gateway", "<html>oops</html>", None);
        assert_eq!(err.short_message, "Bad Gateway");
        assert_eq!(err.response_data, Some(Value::String("<html>oops</html>".into())));
        assert!(err.is_transient());

        let bare = ErrorInfo::from_response("GET", "/x", 500, "", "", None);
        assert_eq!(bare.short_message, "HTTP 500");
        assert_eq!(bare.response_data, None);
    }

    #[test]
    fn decode_errors_are_flagged_and_not_transient() {
        let err = ErrorInfo::decode("POST", "http://h/api/facturas/desde-pago", "missing field `id`");
        assert!(err.is_decode_error());
        assert!(!err.is_transient());
        assert_eq!(err.status, None);

        let net = ErrorInfo::network("GET", "http://h/x", None, "Failed to fetch");
        assert!(!net.is_decode_error());
    }

    #[test]
    fn network_errors_are_not_transient() {
        let err = ErrorInfo::network("GET", "/x", None, "timeout");
        assert_eq!(err.status, None);
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "Error de red: timeout");
    }
}
