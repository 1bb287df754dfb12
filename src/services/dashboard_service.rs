// src/services/dashboard_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{finish, Store},
    models::{
        dashboard::{ClientStat, InvoiceStats, MonthlyRevenue, ProductStat},
        inventory::InventoryStats,
        invoice::{Invoice, InvoiceItem},
    },
};

const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Juin", "Juil", "Août", "Sep", "Oct", "Nov", "Déc",
];

const TOP_LIMIT: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Indicadores do ano (faturas canceladas ficam de fora).
    pub async fn year_stats(&self, year: i32) -> Result<InvoiceStats, AppError> {
        let mut session = self.store.begin().await?;
        let result = async {
            let invoices = session.list_invoices(year).await?;
            let items = session.list_items_for_year(year).await?;
            let inventory = session.inventory_stats().await?;
            Ok::<_, AppError>((invoices, items, inventory))
        }
        .await;
        let (invoices, items, inventory) = finish(session, result).await?;

        Ok(compute_stats(year, &invoices, &items, inventory))
    }
}

pub fn compute_stats(
    year: i32,
    invoices: &[Invoice],
    items: &[InvoiceItem],
    inventory: InventoryStats,
) -> InvoiceStats {
    let total_revenue: Decimal = invoices.iter().map(|invoice| invoice.total_ttc).sum();

    let total_net_profit: Decimal = items
        .iter()
        .map(|item| item.line_total - item.buying_price * Decimal::from(item.quantity))
        .sum();

    // 1. Faturamento mensal
    let mut per_month = [Decimal::ZERO; 12];
    for invoice in invoices {
        per_month[invoice.invoice_date.month0() as usize] += invoice.total_ttc;
    }
    let monthly_revenue = MONTHS
        .iter()
        .zip(per_month)
        .map(|(month, revenue)| MonthlyRevenue {
            month: month.to_string(),
            revenue,
        })
        .collect();

    // 2. Clientes
    let mut clients: HashMap<&str, (Decimal, i64)> = HashMap::new();
    for invoice in invoices {
        let entry = clients.entry(invoice.client_name.as_str()).or_default();
        entry.0 += invoice.total_ttc;
        entry.1 += 1;
    }
    let mut top_clients: Vec<ClientStat> = clients
        .into_iter()
        .map(|(name, (total_spend, invoice_count))| ClientStat {
            name: name.to_string(),
            total_spend,
            invoice_count,
        })
        .collect();
    top_clients.sort_by(|a, b| b.total_spend.cmp(&a.total_spend).then_with(|| a.name.cmp(&b.name)));
    top_clients.truncate(TOP_LIMIT);

    // 3. Produtos (pela descrição impressa)
    let mut products: HashMap<&str, (i64, Decimal)> = HashMap::new();
    for item in items {
        let entry = products.entry(item.description.as_str()).or_default();
        entry.0 += i64::from(item.quantity);
        entry.1 += item.line_total;
    }
    let mut top_products: Vec<ProductStat> = products
        .into_iter()
        .map(|(name, (quantity_sold, revenue))| ProductStat {
            name: name.to_string(),
            quantity_sold,
            revenue,
        })
        .collect();
    top_products.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold).then_with(|| a.name.cmp(&b.name)));
    top_products.truncate(TOP_LIMIT);

    InvoiceStats {
        year,
        total_revenue,
        total_net_profit,
        total_invoices: invoices.len() as i64,
        monthly_revenue,
        top_clients,
        top_products,
        inventory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::PaymentMethod;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn invoice(client: &str, month: u32, ttc: Decimal) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            year: 2025,
            sequence_number: 1,
            custom_display_id: None,
            invoice_date: NaiveDate::from_ymd_opt(2025, month, 10).unwrap(),
            client_name: client.into(),
            client_city: "Rabat".into(),
            client_tax_id: "001234567000089".into(),
            total_ht: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            total_ttc: ttc,
            total_in_words: String::new(),
            payment: PaymentMethod::Cash,
            cancelled_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(description: &str, quantity: i32, buying: Decimal, total: Decimal) -> InvoiceItem {
        InvoiceItem {
            id: Uuid::new_v4(),
            invoice_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            position: 1,
            description: description.into(),
            quantity,
            buying_price: buying,
            unit_price: total / Decimal::from(quantity),
            line_total: total,
        }
    }

    #[test]
    fn totals_months_and_rankings() {
        let invoices = vec![
            invoice("Atlas", 1, dec!(120.00)),
            invoice("Atlas", 2, dec!(60.00)),
            invoice("Nador Bois", 2, dec!(300.00)),
        ];
        let items = vec![
            item("Ciment", 3, dec!(30.00), dec!(120.00)),
            item("Sable", 1, dec!(50.00), dec!(60.00)),
            item("Ciment", 5, dec!(30.00), dec!(300.00)),
        ];

        let inventory = InventoryStats { total_products: 4, low_stock_count: 1 };
        let stats = compute_stats(2025, &invoices, &items, inventory);

        assert_eq!(stats.total_revenue, dec!(480.00));
        // (120 - 90) + (60 - 50) + (300 - 150)
        assert_eq!(stats.total_net_profit, dec!(190.00));
        assert_eq!(stats.total_invoices, 3);

        assert_eq!(stats.monthly_revenue.len(), 12);
        assert_eq!(stats.monthly_revenue[0].revenue, dec!(120.00));
        assert_eq!(stats.monthly_revenue[1].month, "Fév");
        assert_eq!(stats.monthly_revenue[1].revenue, dec!(360.00));
        assert_eq!(stats.monthly_revenue[7].month, "Août");

        assert_eq!(stats.top_clients[0].name, "Nador Bois");
        assert_eq!(stats.top_clients[1].invoice_count, 2);

        assert_eq!(stats.top_products[0].name, "Ciment");
        assert_eq!(stats.top_products[0].quantity_sold, 8);
        assert_eq!(stats.inventory, inventory);
    }

    #[test]
    fn rankings_keep_only_five() {
        let invoices: Vec<Invoice> = (1..=7)
            .map(|n| invoice(&format!("Client {n}"), 3, Decimal::from(n)))
            .collect();
        let stats = compute_stats(2025, &invoices, &[], InventoryStats::default());
        assert_eq!(stats.top_clients.len(), 5);
        assert_eq!(stats.top_clients[0].name, "Client 7");
        assert_eq!(stats.total_net_profit, Decimal::ZERO);
    }
}
