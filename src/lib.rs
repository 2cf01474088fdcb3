pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod store;
pub mod transfer;

pub use db::Database;
