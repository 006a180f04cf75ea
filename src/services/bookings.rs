//! Ledger booking line construction
//!
//! Shared by invoices and credit notes: group line items by their mapped
//! ledger tax category, emit one booking line per item, and accumulate the
//! VAT total per category. Credit notes pass a negative sign so amounts are
//! inverted. All arithmetic stays in `Decimal`; the final rounding is
//! half-up (midpoint away from zero), not banker's rounding.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::clients::snelstart::{BookingLine, LedgerAccountRef, TaxLine};
use crate::entities::tax_mappings;
use crate::error::SyncError;
use crate::models::source::LineItem;

/// Optional freeform adjustment line (credit notes).
pub struct FreeformLine {
    pub amount: Decimal,
    pub tax: Decimal,
    pub description: String,
}

pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a monetary amount the way the ledger wire format expects.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value, 2))
}

fn find_mapping(
    mappings: &[tax_mappings::Model],
    percentage: Decimal,
) -> Result<&tax_mappings::Model, SyncError> {
    mappings
        .iter()
        .find(|m| Decimal::try_from(m.tax_amount).map(|a| a == percentage).unwrap_or(false))
        .ok_or(SyncError::MissingTaxMapping(percentage))
}

fn accumulate(totals: &mut Vec<(String, Decimal)>, category: &str, tax: Decimal) {
    if let Some(entry) = totals.iter_mut().find(|(name, _)| name == category) {
        entry.1 += tax;
    } else {
        totals.push((category.to_string(), tax));
    }
}

/// Build the booking lines and per-category tax lines for one document.
///
/// `sign` is `1` for invoices and `-1` for credit notes. Shipping cost, when
/// present, becomes an extra line mapped through the tax mapping matching its
/// implied tax percentage (`shipping_tax / shipping_cost * 100`, rounded to a
/// whole percent). Only strictly positive per-category tax totals are
/// emitted.
pub fn construct_order_and_tax_lines(
    line_items: &[LineItem],
    shipping: Option<(Decimal, Decimal)>,
    freeform: Option<FreeformLine>,
    sign: Decimal,
    mappings: &[tax_mappings::Model],
) -> Result<(Vec<BookingLine>, Vec<TaxLine>), SyncError> {
    let mut booking_lines = Vec::with_capacity(line_items.len() + 2);
    let mut tax_totals: Vec<(String, Decimal)> = Vec::new();

    for item in line_items {
        let quantity: i64 = item.line_quantities.iter().map(|q| q.quantity).sum();
        let mapping = find_mapping(mappings, item.tax_level)?;

        let extended = item.unit_price * Decimal::from(quantity) * sign;
        booking_lines.push(BookingLine {
            description: format!("{} x {} {}", quantity, item.product_id, item.product_name),
            ledger_account: LedgerAccountRef {
                id: mapping.ledger_account_id.clone(),
            },
            amount: format_amount(extended),
            tax_category: mapping.name.clone(),
        });

        accumulate(
            &mut tax_totals,
            &mapping.name,
            extended * item.tax_level / Decimal::from(100),
        );
    }

    if let Some((shipping_cost, shipping_tax)) = shipping {
        if !shipping_cost.is_zero() {
            let implied = round_half_up(shipping_tax / shipping_cost * Decimal::from(100), 0);
            let mapping = find_mapping(mappings, implied).map_err(|_| {
                SyncError::Other(format!(
                    "Tax mapping for computed shipping tax amount {} does not exist",
                    implied
                ))
            })?;

            booking_lines.push(BookingLine {
                description: "Shipping".to_string(),
                ledger_account: LedgerAccountRef {
                    id: mapping.shipping_ledger_account_id.clone(),
                },
                amount: format_amount(shipping_cost * sign),
                tax_category: mapping.name.clone(),
            });

            accumulate(&mut tax_totals, &mapping.name, shipping_tax * sign);
        }
    }

    if let Some(freeform_line) = freeform {
        if !freeform_line.amount.is_zero() {
            let implied = (freeform_line.tax / freeform_line.amount * Decimal::from(100))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            let mapping = find_mapping(mappings, implied).map_err(|_| {
                SyncError::Other(format!(
                    "Error finding tax mapping for freeform amount: tax mapping for computed tax amount {} does not exist",
                    implied
                ))
            })?;

            booking_lines.push(BookingLine {
                description: format!("Freeform ({})", freeform_line.description),
                ledger_account: LedgerAccountRef {
                    id: mapping.ledger_account_id.clone(),
                },
                amount: format_amount(freeform_line.amount * sign),
                tax_category: mapping.name.clone(),
            });

            if !freeform_line.tax.is_zero() {
                accumulate(&mut tax_totals, &mapping.name, freeform_line.tax * sign);
            }
        }
    }

    let tax_lines = tax_totals
        .into_iter()
        .filter(|(_, total)| *total > Decimal::ZERO)
        .map(|(category, total)| TaxLine {
            tax_category: category,
            tax_amount: format_amount(total),
        })
        .collect();

    Ok((booking_lines, tax_lines))
}

/// Payment terms arrive as free text ("30 days"); take the leading digits.
pub fn parse_payment_term_days(payment_terms: Option<&str>) -> i32 {
    payment_terms
        .map(|terms| {
            terms
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}
