//! Mailsmith - admin studio for templated email messages.
//!
//! The crate is organized around the template editor form:
//!
//! - [`form`] holds the field visibility behavior: a fixed decision
//!   table keyed on the content-type selector and the autogenerate
//!   checkbox, applied through injected element handles.
//! - [`template`] is the domain: the template model, the catalog with
//!   scoped lookup, placeholder rendering, plain-text autogeneration,
//!   and message composition.
//! - [`journal`] records composition attempts and purges old entries.
//! - [`admin`] (egui) and [`cli`] (console REPL) are the two front ends
//!   driving the same form behavior.
//! - [`settings`] and [`paths`] cover configuration loading.

pub mod admin;
pub mod cli;
pub mod form;
pub mod journal;
pub mod paths;
pub mod settings;
pub mod template;
