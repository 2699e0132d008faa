//! Saving server-generated files (invoice PDFs) through the browser
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Save raw bytes as a file download
pub fn save_bytes(bytes: &[u8], filename: &str, mime: &str) -> Result<(), String> {
    if bytes.is_empty() {
        return Err("El archivo está vacío".to_string());
    }
    let blob = create_blob(bytes, mime)?;
    download_blob(&blob, filename)
}

/// File name for an invoice PDF, safe for the download attribute
pub fn pdf_file_name(invoice_number: &str) -> String {
    let cleaned: String = invoice_number
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("factura_{}.pdf", cleaned.trim_matches('_'))
}

fn create_blob(bytes: &[u8], mime: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    Blob::new_with_u8_array_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Trigger a download through a temporary anchor
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    let body = document.body().ok_or("No body element")?;
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_file_name() {
        assert_eq!(pdf_file_name("F-000077"), "factura_F-000077.pdf");
        assert_eq!(pdf_file_name("#12"), "factura_12.pdf");
        assert_eq!(pdf_file_name("A B/C"), "factura_A_B_C.pdf");
    }
}
