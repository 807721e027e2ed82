use rust_decimal::Decimal;

/// Outstanding balance of an invoice. Computed on read and never stored.
///
/// Overpaid invoices yield a negative amount; that case is not clamped.
pub fn pending_amount(invoice_amount: Decimal, amount_paid: Decimal) -> Decimal {
    invoice_amount - amount_paid
}
