//! Core logic - framework-agnostic session, routing, form and presentation rules.
//!
//! Nothing in here touches the network or renders markup. Controllers return
//! [`submission::Effect`]s and the application shell decides how to run them.

/// Form draft and the payload built from it
pub mod draft;
/// Bill list ordering and display formatting
pub mod presenter;
/// Reviewer decisions on pending bills
pub mod review;
/// Path resolution, access gate and navigation highlighting
pub mod route;
/// Read-only session accessor
pub mod session;
/// New-bill submission state machine
pub mod submission;
/// Receipt file acceptance
pub mod upload;
