//! Invoice rendering.
//!
//! The layout engine is a collaborator behind [`InvoiceGenerator`]: it
//! consumes a structured [`InvoiceDocument`] and either produces a file at
//! a deterministic path keyed by the invoice number, or fails. Rendering
//! is a blocking, synchronous call on the checkout path.

use std::path::PathBuf;

use askama::Template;
use chrono::NaiveDate;
use thiserror::Error;

use apotheca_core::{Money, PaymentMethod};

/// One item line on an invoice.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Everything the layout engine needs to produce an invoice.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    /// Reference in the form `INV<unix_timestamp>`; also the file stem.
    pub invoice_number: String,
    /// Issue date printed on the document.
    pub issued_on: NaiveDate,
    pub customer_name: String,
    pub customer_phone: String,
    pub payment_method: PaymentMethod,
    pub lines: Vec<InvoiceLine>,
    pub grand_total: Money,
    /// Free-form instructions or comments from the checkout form.
    pub comments: String,
}

/// Errors that can occur while producing an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Could not write the output file.
    #[error("failed to write invoice: {0}")]
    Io(#[from] std::io::Error),
}

/// The invoice layout engine boundary.
pub trait InvoiceGenerator: Send + Sync {
    /// Produce the invoice document, returning the path it was written to.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` if the document cannot be produced.
    fn generate(&self, document: &InvoiceDocument) -> Result<PathBuf, InvoiceError>;
}

/// Invoice document template.
#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceTemplate<'a> {
    doc: &'a InvoiceDocument,
}

/// Renders invoices as HTML files under a configured directory.
#[derive(Debug, Clone)]
pub struct HtmlInvoiceGenerator {
    output_dir: PathBuf,
}

impl HtmlInvoiceGenerator {
    /// Create a generator writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The path an invoice number renders to.
    #[must_use]
    pub fn path_for(&self, invoice_number: &str) -> PathBuf {
        self.output_dir.join(format!("{invoice_number}.html"))
    }
}

impl InvoiceGenerator for HtmlInvoiceGenerator {
    fn generate(&self, document: &InvoiceDocument) -> Result<PathBuf, InvoiceError> {
        let html = InvoiceTemplate { doc: document }.render()?;

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(&document.invoice_number);
        std::fs::write(&path, html)?;

        tracing::info!(invoice = %document.invoice_number, path = %path.display(), "Invoice rendered");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn money(s: &str) -> Money {
        Money::cedis(s.parse::<Decimal>().unwrap())
    }

    fn sample_document() -> InvoiceDocument {
        InvoiceDocument {
            invoice_number: "INV1700000000".to_owned(),
            issued_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            customer_name: "Ama Mensah".to_owned(),
            customer_phone: "+233201234567".to_owned(),
            payment_method: PaymentMethod::Cash,
            lines: vec![InvoiceLine {
                name: "Paracetamol".to_owned(),
                quantity: 2,
                unit_price: money("5.00"),
                line_total: money("10.00"),
            }],
            grand_total: money("10.00"),
            comments: "Take after meals".to_owned(),
        }
    }

    #[test]
    fn test_renders_to_deterministic_path() {
        let dir = std::env::temp_dir().join("apotheca-invoice-test");
        let generator = HtmlInvoiceGenerator::new(&dir);
        let doc = sample_document();

        let path = generator.generate(&doc).unwrap();
        assert_eq!(path, dir.join("INV1700000000.html"));

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("INV1700000000"));
        assert!(html.contains("Ama Mensah"));
        assert!(html.contains("Paracetamol"));
        assert!(html.contains("GHS 10.00"));
        assert!(html.contains("Take after meals"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unwritable_directory_fails() {
        // A file where the directory should be makes create_dir_all fail.
        let blocker = std::env::temp_dir().join("apotheca-invoice-blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let generator = HtmlInvoiceGenerator::new(&blocker);
        let err = generator.generate(&sample_document()).unwrap_err();
        assert!(matches!(err, InvoiceError::Io(_)));

        std::fs::remove_file(&blocker).ok();
    }
}
