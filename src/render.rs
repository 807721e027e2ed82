use chrono::NaiveDateTime;
use comfy_table::{Table, presets::UTF8_FULL};
use core_types::{Client, CustomerTotal, PendingInvoice, PlatformTransaction};
use rust_decimal::Decimal;

pub const NO_CLIENTS: &str = "No clients registered.";
pub const NO_INVOICES: &str = "No pending invoices.";
pub const NO_PAYMENTS: &str = "No payments recorded.";
pub const NO_TRANSACTIONS: &str = "No transactions for this platform.";

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    table
}

pub fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

pub fn timestamp(date_time: &NaiveDateTime) -> String {
    date_time.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn clients(clients: &[Client]) -> String {
    if clients.is_empty() {
        return NO_CLIENTS.to_string();
    }
    let mut table = table(&["ID", "Name", "Identification", "Address", "Phone", "Email"]);
    for c in clients {
        table.add_row(vec![
            c.id_client.to_string(),
            c.customer_name.clone(),
            c.identification.clone(),
            c.address.clone(),
            c.phone_number.clone(),
            c.email.clone(),
        ]);
    }
    table.to_string()
}

pub fn pending_invoices(invoices: &[PendingInvoice]) -> String {
    if invoices.is_empty() {
        return NO_INVOICES.to_string();
    }
    let mut table = table(&[
        "Invoice ID",
        "Client",
        "Identification",
        "Pending Amount",
        "Transaction Date",
    ]);
    for i in invoices {
        table.add_row(vec![
            i.id_billing.to_string(),
            i.customer_name.clone(),
            i.identification.clone(),
            money(i.pending_amount),
            timestamp(&i.date_time),
        ]);
    }
    table.to_string()
}

pub fn totals(totals: &[CustomerTotal]) -> String {
    if totals.is_empty() {
        return NO_PAYMENTS.to_string();
    }
    let mut table = table(&["Client", "Identification", "Total Paid"]);
    for t in totals {
        table.add_row(vec![
            t.customer_name.clone(),
            t.identification.clone(),
            money(t.total_paid),
        ]);
    }
    table.to_string()
}

pub fn platform_transactions(rows: &[PlatformTransaction]) -> String {
    if rows.is_empty() {
        return NO_TRANSACTIONS.to_string();
    }
    let mut table = table(&[
        "Transaction",
        "Date",
        "Amount",
        "State",
        "Client",
        "Identification",
        "Invoice ID",
        "Period",
    ]);
    for r in rows {
        table.add_row(vec![
            r.id_transaction.to_string(),
            timestamp(&r.date_time),
            money(r.transaction_amount),
            r.state.clone(),
            r.customer_name.clone(),
            r.identification.clone(),
            r.id_billing.to_string(),
            r.billing_period.clone(),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice(pending: Decimal) -> PendingInvoice {
        PendingInvoice {
            id_billing: 12,
            customer_name: "Ana".to_string(),
            identification: "123".to_string(),
            phone_number: String::new(),
            email: String::new(),
            id_transaction: 3,
            date_time: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(14, 5, 9)
                .unwrap(),
            transaction_amount: dec!(100),
            invoice_amount: dec!(100),
            amount_paid: dec!(100) - pending,
            pending_amount: pending,
        }
    }

    #[test]
    fn empty_lists_have_placeholders() {
        assert_eq!(clients(&[]), NO_CLIENTS);
        assert_eq!(pending_invoices(&[]), NO_INVOICES);
        assert_eq!(totals(&[]), NO_PAYMENTS);
        assert_eq!(platform_transactions(&[]), NO_TRANSACTIONS);
    }

    #[test]
    fn money_always_has_two_decimals() {
        assert_eq!(money(dec!(60)), "$60.00");
        assert_eq!(money(dec!(60.05)), "$60.05");
        assert_eq!(money(dec!(-20.5)), "$-20.50");
    }

    #[test]
    fn invoice_rows_show_amount_and_date() {
        let rendered = pending_invoices(&[invoice(dec!(60.5))]);
        assert!(rendered.contains("Ana"));
        assert!(rendered.contains("$60.50"));
        assert!(rendered.contains("2024-06-01 14:05:09"));
    }

    #[test]
    fn client_rows_list_every_field() {
        let rendered = clients(&[Client {
            id_client: 8,
            customer_name: "Luis".to_string(),
            identification: "456".to_string(),
            address: "Calle 2".to_string(),
            phone_number: "555-0101".to_string(),
            email: "luis@example.com".to_string(),
        }]);
        for needle in ["8", "Luis", "456", "Calle 2", "555-0101", "luis@example.com"] {
            assert!(rendered.contains(needle), "missing {needle}");
        }
    }
}
