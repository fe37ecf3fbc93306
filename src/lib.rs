pub mod api;
pub mod cli;
pub mod db;
pub mod error;
pub mod models;
pub mod ordering;

pub use db::Database;
pub use error::{CrmError, Result};
