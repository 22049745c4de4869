pub mod csv_export;
pub mod repository;
pub mod service;
