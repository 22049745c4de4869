pub mod aggregate;

pub use aggregate::{
    CorrectiveMaintenance, CorrectiveMaintenanceDto, CorrectiveMaintenanceId, IncidentListQuery,
    IncidentStatus, Priority,
};
