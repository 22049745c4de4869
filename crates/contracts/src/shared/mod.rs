pub mod filter;
pub mod logger;
pub mod pagination;
pub mod selection;
pub mod table;
pub mod validation;
