pub mod aggregate;

pub use aggregate::{Criticality, Equipment, EquipmentDto, EquipmentId, EquipmentListQuery, EquipmentStatus};
