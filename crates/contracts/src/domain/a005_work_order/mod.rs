pub mod aggregate;

pub use aggregate::{
    ChecklistResult, WorkOrder, WorkOrderDto, WorkOrderId, WorkOrderListQuery, WorkOrderStatus,
};
