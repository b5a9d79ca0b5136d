// src/services/pdf_service.rs

use std::path::{Path, PathBuf};

use genpdf::{elements, style, Alignment, Element};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::InvoiceRepository,
    models::{invoice::InvoiceDocument, party::Party},
    services::words,
};

const DECLARATION: &str = "We declare that this invoice shows the actual price of goods \
and all the particulars are true and correct.";

// Column weights for the item table: Product, HSN, Rate, Qty, Disc, GST %,
// Taxable, CGST, SGST, IGST, Total.
const ITEM_COLUMNS: [usize; 11] = [28, 12, 12, 9, 10, 10, 16, 13, 13, 13, 14];

/// A rendered document plus the sanitized filename it is served under.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct PdfService {
    invoices: InvoiceRepository,
    fonts_dir: PathBuf,
    font_family: String,
    output_dir: PathBuf,
}

impl PdfService {
    pub fn new(
        invoices: InvoiceRepository,
        fonts_dir: PathBuf,
        font_family: String,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            invoices,
            fonts_dir,
            font_family,
            output_dir,
        }
    }

    /// Loads the joined invoice graph, renders the PDF on a blocking worker,
    /// writes a copy under the output directory and returns the bytes for
    /// the download response.
    pub async fn generate_invoice_pdf(&self, id: i64) -> Result<RenderedPdf, AppError> {
        let document = self.invoices.find_document(id).await?;

        let fonts_dir = self.fonts_dir.clone();
        let font_family = self.font_family.clone();
        let rendered = tokio::task::spawn_blocking(move || {
            render_document(&document, &fonts_dir, &font_family)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))??;

        let path = self.output_dir.join(&rendered.filename);
        tokio::fs::write(&path, &rendered.bytes)
            .await
            .map_err(|e| {
                AppError::Render(format!("failed to write {}: {e}", path.display()))
            })?;
        tracing::info!(path = %path.display(), "invoice document written");

        Ok(rendered)
    }
}

fn render_document(
    doc: &InvoiceDocument,
    fonts_dir: &Path,
    family: &str,
) -> Result<RenderedPdf, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, family, None).map_err(|e| {
        AppError::FontNotFound(format!("{family} in {}: {e}", fonts_dir.display()))
    })?;

    let invoice = &doc.invoice;
    let bold = style::Style::new().bold();

    let mut pdf = genpdf::Document::new(font_family);
    pdf.set_title(format!("Tax Invoice {}", invoice.invoice_no));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    pdf.set_page_decorator(decorator);

    // --- Title block ---
    let mut title = elements::Paragraph::new("TAX INVOICE");
    title.set_alignment(Alignment::Center);
    pdf.push(title.styled(style::Style::new().bold().with_font_size(14)));
    pdf.push(elements::Break::new(0.5));

    pdf.push(elements::Paragraph::new(format!(
        "Invoice No: {}",
        safe_text(&invoice.invoice_no)
    )));
    pdf.push(elements::Paragraph::new(format!("Date: {}", invoice.date)));
    pdf.push(elements::Break::new(1));

    // --- Seller / Receiver boxes, side by side ---
    let mut parties = elements::TableLayout::new(vec![1, 1]);
    parties.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    parties
        .row()
        .element(elements::Paragraph::new("Seller").styled(bold))
        .element(elements::Paragraph::new("Receiver").styled(bold))
        .push()
        .expect("party header row");
    parties
        .row()
        .element(party_box(&doc.seller))
        .element(party_box(&doc.receiver))
        .push()
        .expect("party detail row");
    pdf.push(parties);
    pdf.push(elements::Break::new(1));

    // --- Item table ---
    let mut table = elements::TableLayout::new(ITEM_COLUMNS.to_vec());
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let mut header = table.row();
    for heading in [
        "Product", "HSN", "Rate", "Qty", "Disc", "GST %", "Taxable", "CGST", "SGST", "IGST",
        "Total",
    ] {
        header = header.element(elements::Paragraph::new(heading).styled(bold));
    }
    header.push().expect("item header row");

    for entry in &doc.items {
        let item = &entry.item;
        // The line total is derived here, not stored.
        let line_total = item.taxable + item.cgst + item.sgst + item.igst;
        table
            .row()
            .element(elements::Paragraph::new(safe_text(&entry.product_name)))
            .element(elements::Paragraph::new(safe_text(&entry.hsn)))
            .element(elements::Paragraph::new(money(item.rate)))
            .element(elements::Paragraph::new(money(item.qty)))
            .element(elements::Paragraph::new(money(item.discount)))
            .element(elements::Paragraph::new(format!("{}%", entry.gst_rate)))
            .element(elements::Paragraph::new(money(item.taxable)))
            .element(elements::Paragraph::new(money(item.cgst)))
            .element(elements::Paragraph::new(money(item.sgst)))
            .element(elements::Paragraph::new(money(item.igst)))
            .element(elements::Paragraph::new(money(line_total)))
            .push()
            .expect("item row");
    }

    // The totals row echoes the invoice header fields, it is never re-summed
    // from the items.
    let mut total_label = elements::Paragraph::new("TOTAL");
    total_label.set_alignment(Alignment::Right);
    let mut totals_row = table.row();
    for _ in 0..6 {
        totals_row = totals_row.element(elements::Paragraph::new(""));
    }
    totals_row
        .element(total_label.styled(bold))
        .element(elements::Paragraph::new(money(invoice.cgst)).styled(bold))
        .element(elements::Paragraph::new(money(invoice.sgst)).styled(bold))
        .element(elements::Paragraph::new(money(invoice.igst)).styled(bold))
        .element(elements::Paragraph::new(money(invoice.total)).styled(bold))
        .push()
        .expect("totals row");

    pdf.push(table);
    pdf.push(elements::Break::new(1));

    // --- Amount in words ---
    // Conversion failure leaves the field empty rather than failing the
    // whole document.
    let amount_words = words::rupees_in_words(invoice.total).unwrap_or_else(|| {
        tracing::warn!(
            invoice_no = %invoice.invoice_no,
            "amount in words unavailable, leaving the field empty"
        );
        String::new()
    });
    pdf.push(elements::Paragraph::new("Amount in Words :").styled(bold));
    pdf.push(elements::Paragraph::new(safe_text(&amount_words)));
    pdf.push(elements::Break::new(1));

    // --- Declaration ---
    pdf.push(elements::Paragraph::new("Declaration").styled(bold));
    pdf.push(elements::Paragraph::new(DECLARATION));
    pdf.push(elements::Break::new(2));

    // --- Signature block ---
    let mut signatory = elements::Paragraph::new("For Authorised Signatory");
    signatory.set_alignment(Alignment::Right);
    pdf.push(signatory.styled(bold));
    pdf.push(elements::Break::new(2));
    let mut signature_line = elements::Paragraph::new("__________________________");
    signature_line.set_alignment(Alignment::Right);
    pdf.push(signature_line);

    let mut buffer = Vec::new();
    pdf.render(&mut buffer)
        .map_err(|e| AppError::Render(e.to_string()))?;

    Ok(RenderedPdf {
        filename: document_filename(&invoice.invoice_no),
        bytes: buffer,
    })
}

fn party_box(party: &Party) -> elements::LinearLayout {
    let mut layout = elements::LinearLayout::vertical();
    layout.push(elements::Paragraph::new(safe_text(&party.name)));
    for line in party.address.lines() {
        layout.push(elements::Paragraph::new(safe_text(line)));
    }
    layout.push(elements::Paragraph::new(safe_text(&format!(
        "GSTIN: {}",
        party.gstin
    ))));
    layout
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

// Lossy by policy: characters the PDF fonts cannot be relied on to carry
// (anything outside Latin-1) are dropped, so exotic input never fails a
// document.
fn safe_text(text: &str) -> String {
    text.chars().filter(|&c| (c as u32) <= 0xFF).collect()
}

/// `GST_Invoice_<invoice no>.pdf` with filesystem-unsafe characters
/// replaced, so an invoice number like "INV/2024/07" stays servable.
fn document_filename(invoice_no: &str) -> String {
    let sanitized: String = safe_text(invoice_no)
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '-'
            } else {
                c
            }
        })
        .collect();
    format!("GST_Invoice_{sanitized}.pdf")
}
