pub mod client;
pub mod dashboard;
pub mod inventory;
pub mod invoice;
