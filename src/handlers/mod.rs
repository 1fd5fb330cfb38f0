pub mod account;
pub mod auth;
pub mod funds;
pub mod lobby;
pub mod vip;
pub mod wallet;
