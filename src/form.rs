//! Template editor form behavior.
//!
//! The editor form shows and hides its body fields depending on the
//! template's content type and the autogenerate-text checkbox. The rules
//! live in [`visibility`] as a fixed decision table, and
//! [`controller::VisibilityController`] pushes the resolved layout to the
//! hosting front end through the element handles in [`handles`].

pub mod controller;
pub mod handles;
pub mod visibility;


pub use controller::VisibilityController;
pub use handles::{
    CheckboxHandle, RegionHandle, SelectorHandle, SharedCheckbox, SharedInputs, SharedSelector,
};
pub use visibility::{FieldLayout, FormState, HTML, PLAIN_TEXT};
