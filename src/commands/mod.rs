pub mod auth;
pub mod dashboard;
pub mod db;
pub mod funds;
pub mod ledger;
pub mod reports;
pub mod requests;
pub mod settings;
pub mod watcher;
