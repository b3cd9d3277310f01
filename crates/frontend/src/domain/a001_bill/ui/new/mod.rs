//! New bill UI Module
//!
//! - view_model.rs: form state, receipt checks and submit command
//! - view.rs: Leptos component

mod view;
pub mod view_model;

pub use view::NewBillPage;
pub use view_model::NewBillViewModel;
