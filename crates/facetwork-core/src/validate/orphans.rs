use super::{MetaModelValidator, ValidationContext, ValidationFailures};
use crate::{Identifier, MethodId};

/// Reports supporting methods (`choicesX`, `hideX`, ...) and `setX`
/// mutators that no member claimed, usually a typo in the member name.
///
/// An inherited method is reported once, on the type that declares it.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrphanedMethodsValidator;

impl MetaModelValidator for OrphanedMethodsValidator {
    fn name(&self) -> &'static str {
        "OrphanedMethods"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, failures: &mut ValidationFailures) {
        for spec in ctx.introspected() {
            let declared_here = |m: &&MethodId| &m.declaring == spec.type_name();
            for method in spec.unclaimed_methods().iter().filter(declared_here) {
                failures.push(
                    Identifier::member(spec.type_name().clone(), method.name.as_str()),
                    format!("method '{method}' does not match any member"),
                );
            }
        }
    }
}
