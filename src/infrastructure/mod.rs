pub mod in_memory;
pub mod transaction_log;
