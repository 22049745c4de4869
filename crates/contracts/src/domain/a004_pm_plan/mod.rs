pub mod aggregate;

pub use aggregate::{
    Frequency, GenerateResult, PlanStatus, PlanStatusResponse, PmPlan, PmPlanDto, PmPlanId,
    PmPlanItem,
};
