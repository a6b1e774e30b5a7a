//! Database entity models for the shop ledger and its collaborators.

pub mod audit_entry;
pub mod booking;
pub mod car;
pub mod client;
pub mod material_item;
pub mod payment;
pub mod work_item;
pub mod work_order;
