pub mod analytics_service;
pub mod export_service;
pub mod import_service;
pub mod statement_parser;
pub mod transaction_service;
