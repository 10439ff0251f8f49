pub mod client;
pub mod error;
pub mod row;

pub use client::{RowStatus, SheetsClient};
pub use error::SheetsError;
pub use row::{record_to_row, HEADER};
