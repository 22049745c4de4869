mod view;
mod view_model;

pub use view::WorkOrderDetails;
pub use view_model::WorkOrderDetailsViewModel;
