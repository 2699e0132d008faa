//! Invoice details UI module
//!
//! - page.rs: route entry points (payment return, invoice detail)
//! - view_model.rs: state signals and commands
//! - view.rs: Leptos component (pure UI)

mod page;
mod view;
mod view_model;

pub use page::{InvoiceDetailsPage, PaymentReturnPage};
pub use view::InvoiceReconcilerView;
pub use view_model::InvoiceReconcilerViewModel;
