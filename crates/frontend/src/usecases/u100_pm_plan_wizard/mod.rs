pub mod view;

pub use view::PmPlanWizardPage;
