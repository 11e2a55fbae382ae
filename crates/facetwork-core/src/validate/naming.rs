use super::{MetaModelValidator, ValidationContext, ValidationFailures};
use crate::{Identifier, TypeName};
use std::collections::BTreeMap;

/// Reports concrete domain types sharing a logical type name.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalTypeNameValidator;

impl MetaModelValidator for LogicalTypeNameValidator {
    fn name(&self) -> &'static str {
        "LogicalTypeName"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, failures: &mut ValidationFailures) {
        let mut by_logical: BTreeMap<&str, Vec<&TypeName>> = BTreeMap::new();
        for spec in ctx.introspected() {
            if spec.bean_sort().is_concrete_domain_type() {
                by_logical
                    .entry(spec.logical_type_name())
                    .or_default()
                    .push(spec.type_name());
            }
        }

        for (logical, types) in by_logical {
            let Some((first, rest)) = types.split_first() else {
                continue;
            };
            for duplicate in rest {
                failures.push(
                    Identifier::class((*duplicate).clone()),
                    format!("logical type name '{logical}' is already used by '{first}'"),
                );
            }
        }
    }
}
