mod view;
mod view_model;

pub use view::PmPlanDetails;
pub use view_model::PmPlanDetailsViewModel;
