pub mod error;
pub mod receipt_storage;
pub mod repository;
pub mod service;
