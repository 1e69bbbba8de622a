// src/lib.rs

pub mod db;
pub mod giveaway;
pub mod repositories;
pub mod platforms;
pub mod services;
pub mod tasks;
pub mod utils;
pub mod test_utils;

pub use db::Database;
pub use prizebot_common::error::Error;
