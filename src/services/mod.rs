pub mod account_service;
pub mod transaction_service;
