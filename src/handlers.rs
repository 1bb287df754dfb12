pub mod invoices;
pub mod inventory;
pub mod clients;
