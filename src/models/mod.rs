pub mod bank_account;
pub mod cms;
pub mod game;
pub mod requests;
pub mod transaction;
pub mod user;
pub mod vip;
pub mod wallet;
