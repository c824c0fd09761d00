pub mod configure;
pub mod formatter;
pub mod logger;
pub mod logging;
pub mod simple_kv_storage;
pub mod transfer;
