pub mod totals;
pub mod french_words;
pub mod sequence;
pub mod stock_ledger;
pub mod invoice_service;
pub mod inventory_service;
pub mod client_service;
pub mod dashboard_service;
