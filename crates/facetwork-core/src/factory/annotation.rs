//! Annotation-driven factories.
//!
//! Member annotations are read from the member's method (the accessor for
//! properties and collections, the action method for actions). Parameter
//! annotations are read from the parameter descriptor.

use super::{FacetFactory, ProcessClassContext, ProcessMethodContext, ProcessParameterContext};
use crate::FeatureType;
use crate::class::Annotation;
use crate::facet::{
    DescribedAsFacet, DisabledFacet, FacetCore, FacetHolder, HiddenFacet, MandatoryFacet,
    MaxLengthFacet, MemberOrderFacet, NamedFacet,
};
use crate::introspect::naming::natural_name;

const ALL_FEATURES: &[FeatureType] = &[
    FeatureType::Object,
    FeatureType::Property,
    FeatureType::Collection,
    FeatureType::Action,
    FeatureType::Parameter,
];

const MEMBERS: &[FeatureType] = &[
    FeatureType::Property,
    FeatureType::Collection,
    FeatureType::Action,
];

fn named(annotations: &[Annotation]) -> Option<&str> {
    annotations.iter().find_map(|a| match a {
        Annotation::Named(name) => Some(name.as_str()),
        _ => None,
    })
}

fn described_as(annotations: &[Annotation]) -> Option<&str> {
    annotations.iter().find_map(|a| match a {
        Annotation::DescribedAs(text) => Some(text.as_str()),
        _ => None,
    })
}

fn add_named(holder: &FacetHolder, core: FacetCore, explicit: Option<&str>, fallback: &str) {
    match explicit {
        Some(name) => holder.add(NamedFacet::new(core, name)),
        None => holder.add(NamedFacet::new(core.derived(), natural_name(fallback))),
    };
}

// =============================================================================
// NAMED / DESCRIBED AS
// =============================================================================

/// Explicit display name, otherwise a derived natural name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedFactory;

impl FacetFactory for NamedFactory {
    fn name(&self) -> &'static str {
        "NamedAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        ALL_FEATURES
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        let explicit = named(ctx.class.annotations());
        add_named(ctx.holder, ctx.core(), explicit, ctx.class.name().simple_name());
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let explicit = named(ctx.method.descriptor().annotations());
        add_named(ctx.holder, ctx.core(), explicit, ctx.member_id);
    }

    fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        let explicit = named(&ctx.param.annotations);
        let fallback = match (&ctx.param.name, ctx.param.ty.leaf_type_name()) {
            (Some(name), _) => name.clone(),
            (None, Some(ty)) => ty.simple_name().to_string(),
            (None, None) => format!("arg{}", ctx.index),
        };
        add_named(ctx.holder, ctx.core(), explicit, &fallback);
    }
}

/// Free-text description.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescribedAsFactory;

impl FacetFactory for DescribedAsFactory {
    fn name(&self) -> &'static str {
        "DescribedAsAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        ALL_FEATURES
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        if let Some(text) = described_as(ctx.class.annotations()) {
            ctx.holder.add(DescribedAsFacet::new(ctx.core(), text));
        }
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        if let Some(text) = described_as(ctx.method.descriptor().annotations()) {
            ctx.holder.add(DescribedAsFacet::new(ctx.core(), text));
        }
    }

    fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        if let Some(text) = described_as(&ctx.param.annotations) {
            ctx.holder.add(DescribedAsFacet::new(ctx.core(), text));
        }
    }
}

// =============================================================================
// HIDDEN / DISABLED
// =============================================================================

/// `Hidden` on a member.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenAnnotationFactory;

impl FacetFactory for HiddenAnnotationFactory {
    fn name(&self) -> &'static str {
        "HiddenAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        MEMBERS
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        if ctx.method.descriptor().has_annotation(&Annotation::Hidden) {
            ctx.holder.add(HiddenFacet::new(ctx.core()));
        }
    }
}

/// `Disabled(reason)` on a member.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAnnotationFactory;

impl FacetFactory for DisabledAnnotationFactory {
    fn name(&self) -> &'static str {
        "DisabledAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        MEMBERS
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let reason = ctx
            .method
            .descriptor()
            .annotations()
            .iter()
            .find_map(|a| match a {
                Annotation::Disabled(reason) => Some(reason.clone()),
                _ => None,
            });
        if let Some(reason) = reason {
            ctx.holder.add(DisabledFacet::new(ctx.core(), reason));
        }
    }
}

// =============================================================================
// MAX LENGTH / MANDATORY
// =============================================================================

fn max_length(annotations: &[Annotation]) -> Option<usize> {
    annotations.iter().find_map(|a| match a {
        Annotation::MaxLength(max) => Some(*max),
        _ => None,
    })
}

/// `MaxLength(n)` on a property or parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLengthAnnotationFactory;

impl FacetFactory for MaxLengthAnnotationFactory {
    fn name(&self) -> &'static str {
        "MaxLengthAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Property, FeatureType::Parameter]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        if let Some(max) = max_length(ctx.method.descriptor().annotations()) {
            ctx.holder.add(MaxLengthFacet::new(ctx.core(), max));
        }
    }

    fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        if let Some(max) = max_length(&ctx.param.annotations) {
            ctx.holder.add(MaxLengthFacet::new(ctx.core(), max));
        }
    }
}

/// Mandatory unless annotated `Optional`.
///
/// The default is recorded as a derived facet so that an explicit
/// declaration can be told apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct MandatoryAnnotationFactory;

impl MandatoryAnnotationFactory {
    fn facet(core: FacetCore, annotations: &[Annotation]) -> MandatoryFacet {
        if annotations.contains(&Annotation::Optional) {
            MandatoryFacet::new(core, false)
        } else {
            MandatoryFacet::new(core.derived(), true)
        }
    }
}

impl FacetFactory for MandatoryAnnotationFactory {
    fn name(&self) -> &'static str {
        "MandatoryAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::Property, FeatureType::Parameter]
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let facet = Self::facet(ctx.core(), ctx.method.descriptor().annotations());
        ctx.holder.add(facet);
    }

    fn process_param(&self, ctx: &mut ProcessParameterContext<'_>) {
        let facet = Self::facet(ctx.core(), &ctx.param.annotations);
        ctx.holder.add(facet);
    }
}

// =============================================================================
// MEMBER ORDER
// =============================================================================

/// `MemberOrder(sequence)` on a member.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberOrderAnnotationFactory;

impl FacetFactory for MemberOrderAnnotationFactory {
    fn name(&self) -> &'static str {
        "MemberOrderAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        MEMBERS
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let sequence = ctx
            .method
            .descriptor()
            .annotations()
            .iter()
            .find_map(|a| match a {
                Annotation::MemberOrder(sequence) => Some(sequence.clone()),
                _ => None,
            });
        if let Some(sequence) = sequence {
            ctx.holder.add(MemberOrderFacet::new(ctx.core(), sequence));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
