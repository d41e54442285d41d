//! Passport Templates — Assemble structured records from reusable field
//! templates.
//!
//! A [`Template`] is a skeleton record plus default field bindings. Filling
//! it against a [`Context`] resolves each [`Directive`] to a value: a copy
//! from the first non-empty candidate path, a previously resolved named
//! result, or a deliberate omission. A [`Recipe`] chains fills in declared
//! order, storing each result under a name for later steps.

pub mod context;
pub mod error;
pub mod recipe;
pub mod redaction;
pub mod registry;
pub mod resolver;
pub mod template;

pub use context::Context;
pub use error::TemplateError;
pub use recipe::{Recipe, Step};
pub use redaction::{mask_digits, Redaction};
pub use registry::TemplateRegistry;
pub use resolver::fill;
pub use template::{Directive, FieldDirectives, Template, TemplateDefinition};
