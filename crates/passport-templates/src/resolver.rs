use serde_json::Value;

use passport_core::path;

use crate::context::Context;
use crate::error::TemplateError;
use crate::template::{Directive, FieldDirectives, Template};

/// Fill `template` against `context`.
///
/// Starts from the template skeleton and applies the template's own
/// bindings overlaid with `directives`, in declaration order:
///
/// - `Omit` removes the output field, whatever the skeleton held.
/// - `Path` copies the first non-empty candidate from the context scope
///   to the output field; if every candidate is empty the field is removed.
/// - `Result` substitutes a named result stored in the context; a name that
///   was never stored is a [`TemplateError::MissingDependency`].
///
/// The same template, directives and context always yield the same record.
pub fn fill(
    template: &Template,
    directives: &FieldDirectives,
    context: &Context,
) -> Result<Value, TemplateError> {
    let mut output = template.fields().clone();
    let effective = template.bindings().overlay(directives);

    for (field, directive) in effective.iter() {
        match directive {
            Directive::Omit => {
                path::remove(&mut output, field);
            }
            Directive::Path(candidates) => match path::get_first(context.scope(), candidates) {
                Some(value) => path::set(&mut output, field, value.clone()),
                None => {
                    path::remove(&mut output, field);
                }
            },
            Directive::Result(name) => {
                let result = context.result(name).ok_or_else(|| TemplateError::MissingDependency {
                    template: template.name().to_string(),
                    result: name.clone(),
                })?;
                path::set(&mut output, field, result.clone());
            }
        }
    }

    tracing::debug!(
        template = template.name(),
        directives = effective.len(),
        "template filled"
    );
    Ok(output)
}
