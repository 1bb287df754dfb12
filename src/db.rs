pub mod store;
pub use store::{finish, Session, Store};
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod pg_store;
pub use pg_store::PgStore;
