pub mod announcements;
pub mod auth_service;
pub mod catalog;
pub mod history;
pub mod ledger;
pub mod receipts;
pub mod requests;
pub mod vip;
