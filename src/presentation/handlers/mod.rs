mod extract_bill;
mod health;

pub use extract_bill::{ExtractBillRequest, ExtractBillResponse, extract_bill_handler};
pub use health::health_handler;
