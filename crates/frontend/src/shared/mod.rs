pub mod api_client;
pub mod api_error;
pub mod api_utils;
pub mod clipboard;
pub mod config;
pub mod export;
pub mod number_format;
pub mod storage;
