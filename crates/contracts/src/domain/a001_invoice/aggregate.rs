use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Invoice ("factura") as returned by the backend.
///
/// Only the fields the client renders are typed; everything else is kept in
/// `extra` and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    #[serde(default)]
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub total: f64,
    #[serde(default)]
    pub moneda: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Invoice {
    /// Display number, falling back to the numeric id
    pub fn display_number(&self) -> String {
        match &self.numero {
            Some(n) if !n.trim().is_empty() => n.clone(),
            _ => format!("#{}", self.id),
        }
    }

    pub fn currency(&self) -> &str {
        self.moneda.as_deref().unwrap_or("COP")
    }
}

// Decimal columns arrive as JSON strings ("50000.00") from some endpoints.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("total is not a finite number")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid total '{}': {}", s, e))),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!(
            "unexpected total value: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_string_totals() {
        let a: Invoice =
            serde_json::from_str(r#"{"id":77,"numero":"F-000077","total":50000,"moneda":"COP"}"#)
                .unwrap();
        assert_eq!(a.total, 50000.0);

        let b: Invoice =
            serde_json::from_str(r#"{"id":78,"numero":"F-000078","total":"1250.50"}"#).unwrap();
        assert_eq!(b.total, 1250.5);
        assert_eq!(b.currency(), "COP");
    }

    #[test]
    fn keeps_unknown_fields() {
        let inv: Invoice = serde_json::from_str(
            r#"{"id":5,"total":10,"cliente":{"nombre":"Ana"},"estado":"pagada"}"#,
        )
        .unwrap();
        assert_eq!(inv.extra.get("estado"), Some(&Value::String("pagada".into())));
        assert!(inv.extra.contains_key("cliente"));
        assert_eq!(inv.display_number(), "#5");
    }
}
