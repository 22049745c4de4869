pub mod aggregate;

pub use aggregate::{Factory, FactoryDto, FactoryId, FactoryStatus};
