pub mod candidate;
pub mod settings;
pub mod summary;
pub mod transaction;
