// src/services/tax.rs
//
// GST computation. Pure: the caller resolves products and states, this
// module only does arithmetic.
//
// Intra-state sales split the GST amount evenly into CGST + SGST;
// inter-state sales carry the full amount as IGST. The split is decided once
// per invoice and frozen into the persisted lines.

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::invoice::{InvoiceTotals, LineAmounts},
};

/// One submitted line with its product's GST percentage already resolved.
#[derive(Debug, Clone)]
pub struct LineInput {
    pub product_id: i64,
    pub gst_rate: Decimal,
    pub rate: Decimal,
    pub qty: Decimal,
    pub discount: Decimal,
}

/// Calculator output: the retained lines and the invoice aggregates.
#[derive(Debug, Clone)]
pub struct TaxBreakdown {
    pub lines: Vec<LineAmounts>,
    pub totals: InvoiceTotals,
}

/// Computes per-line taxable value and tax split plus invoice totals.
///
/// Lines with zero rate or zero quantity are empty form rows and are skipped
/// without error. A discount larger than the line amount would produce a
/// negative taxable value (and negative tax); that is rejected.
///
/// Amounts are accumulated at full precision; rounding to two decimals
/// happens only when the document is rendered.
pub fn compute_invoice(
    same_state: bool,
    lines: &[LineInput],
) -> Result<TaxBreakdown, AppError> {
    let mut retained = Vec::with_capacity(lines.len());
    let mut totals = InvoiceTotals::default();

    for line in lines {
        if line.rate.is_sign_negative()
            || line.qty.is_sign_negative()
            || line.discount.is_sign_negative()
            || line.gst_rate.is_sign_negative()
        {
            return Err(AppError::BadRequest(
                "rate, qty, discount and gst_rate must not be negative".to_string(),
            ));
        }

        // Empty form row, not an error. The assembler applies the same rule
        // before its product lookups, so such rows normally never get here;
        // this check keeps the calculator's contract independent of callers.
        if line.rate.is_zero() || line.qty.is_zero() {
            continue;
        }

        let taxable = line.rate * line.qty - line.discount;
        if taxable.is_sign_negative() {
            return Err(AppError::BadRequest(format!(
                "discount {} exceeds the line amount {} for product {}",
                line.discount,
                line.rate * line.qty,
                line.product_id
            )));
        }

        let gst = taxable * line.gst_rate / Decimal::ONE_HUNDRED;
        let (cgst, sgst, igst) = if same_state {
            let half = gst / Decimal::TWO;
            (half, half, Decimal::ZERO)
        } else {
            (Decimal::ZERO, Decimal::ZERO, gst)
        };

        totals.taxable += taxable;
        totals.cgst += cgst;
        totals.sgst += sgst;
        totals.igst += igst;

        retained.push(LineAmounts {
            product_id: line.product_id,
            rate: line.rate,
            qty: line.qty,
            discount: line.discount,
            taxable,
            cgst,
            sgst,
            igst,
        });
    }

    totals.total = totals.taxable + totals.cgst + totals.sgst + totals.igst;

    Ok(TaxBreakdown {
        lines: retained,
        totals,
    })
}
