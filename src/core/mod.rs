pub mod connectivity;
pub mod debug_logger;
pub mod telegram;
