//! Non-humanoid body plans. All face right; facing left mirrors them.

use crate::types::{ColourRole, ShapeKind};

use super::humanoid::{Z_BEHIND, Z_HEAD, Z_HELMET, Z_LEGS, Z_SHADOW, Z_TORSO};
use super::{AnatomicalTemplate, Archetype, BodyPart, PartSpec};

use ShapeKind::*;

fn shadow(width: f64) -> PartSpec {
    PartSpec::new((0.5, 0.92), (width, 0.1), &[Ellipse], Z_SHADOW, ColourRole::Shadow)
        .with_opacity(0.8)
}

pub(super) fn quadruped() -> AnatomicalTemplate {
    AnatomicalTemplate::new("quadruped", Archetype::Quadruped)
        .with_part(BodyPart::Shadow, shadow(0.75))
        .with_part(
            BodyPart::HindLegs,
            PartSpec::new(
                (0.3, 0.76),
                (0.18, 0.26),
                &[Rectangle, Capsule],
                Z_LEGS,
                ColourRole::Secondary,
            ),
        )
        .with_part(
            BodyPart::FrontLegs,
            PartSpec::new(
                (0.66, 0.76),
                (0.18, 0.26),
                &[Rectangle, Capsule],
                Z_LEGS,
                ColourRole::Secondary,
            ),
        )
        .with_part(
            BodyPart::Torso,
            PartSpec::new(
                (0.48, 0.58),
                (0.6, 0.3),
                &[Ellipse, Capsule],
                Z_TORSO,
                ColourRole::Primary,
            ),
        )
        .with_part(
            BodyPart::Tail,
            PartSpec::new(
                (0.13, 0.5),
                (0.18, 0.08),
                &[Capsule, Wave],
                Z_BEHIND,
                ColourRole::Secondary,
            )
                .with_rotation(-25.0),
        )
        .with_part(
            BodyPart::Head,
            PartSpec::new(
                (0.8, 0.4),
                (0.28, 0.26),
                &[Circle, Ellipse, Triangle],
                Z_HEAD,
                ColourRole::Accent1,
            ),
        )
}

pub(super) fn blob() -> AnatomicalTemplate {
    AnatomicalTemplate::new("blob", Archetype::Blob)
        .with_part(BodyPart::Shadow, shadow(0.7))
        .with_part(
            BodyPart::Torso,
            PartSpec::new(
                (0.5, 0.64),
                (0.72, 0.54),
                &[Organic, Ellipse, Circle],
                Z_TORSO,
                ColourRole::Primary,
            )
                .with_opacity(0.9),
        )
        .with_part(
            BodyPart::Core,
            PartSpec::new(
                (0.5, 0.68),
                (0.24, 0.2),
                &[Circle, Diamond],
                Z_TORSO + 5,
                ColourRole::Accent1,
            )
                .with_opacity(0.75),
        )
        .with_part(
            BodyPart::Eyes,
            PartSpec::new(
                (0.56, 0.52),
                (0.3, 0.1),
                &[Ellipse, Circle],
                Z_HELMET,
                ColourRole::Highlight2,
            ),
        )
}

pub(super) fn mechanical() -> AnatomicalTemplate {
    AnatomicalTemplate::new("mechanical", Archetype::Mechanical)
        .with_part(BodyPart::Shadow, shadow(0.6))
        .with_part(
            BodyPart::Legs,
            PartSpec::new((0.5, 0.8), (0.4, 0.22), &[Rectangle], Z_LEGS, ColourRole::Secondary),
        )
        .with_part(
            BodyPart::Torso,
            PartSpec::new(
                (0.5, 0.55),
                (0.5, 0.34),
                &[Rectangle, Hexagon],
                Z_TORSO,
                ColourRole::Primary,
            ),
        )
        .with_part(
            BodyPart::Core,
            PartSpec::new(
                (0.5, 0.55),
                (0.14, 0.14),
                &[Circle, Diamond, Hexagon],
                Z_TORSO + 5,
                ColourRole::Highlight1,
            ),
        )
        .with_part(
            BodyPart::Arms,
            PartSpec::new(
                (0.5, 0.55),
                (0.76, 0.14),
                &[Rectangle],
                Z_TORSO + 10,
                ColourRole::Secondary,
            ),
        )
        .with_part(
            BodyPart::Head,
            PartSpec::new(
                (0.52, 0.26),
                (0.3, 0.2),
                &[Rectangle, Hexagon],
                Z_HEAD,
                ColourRole::Accent1,
            ),
        )
}

pub(super) fn flying() -> AnatomicalTemplate {
    AnatomicalTemplate::new("flying", Archetype::Flying)
        .with_part(BodyPart::Shadow, shadow(0.4))
        .with_part(
            BodyPart::LeftWing,
            PartSpec::new(
                (0.3, 0.4),
                (0.4, 0.3),
                &[Crescent, Triangle],
                Z_BEHIND,
                ColourRole::Secondary,
            )
                .with_rotation(-20.0),
        )
        .with_part(
            BodyPart::Tail,
            PartSpec::new(
                (0.22, 0.6),
                (0.2, 0.1),
                &[Triangle, Capsule],
                Z_BEHIND,
                ColourRole::Secondary,
            ),
        )
        .with_part(
            BodyPart::Torso,
            PartSpec::new(
                (0.5, 0.55),
                (0.38, 0.28),
                &[Ellipse, Capsule],
                Z_TORSO,
                ColourRole::Primary,
            ),
        )
        .with_part(
            BodyPart::RightWing,
            PartSpec::new(
                (0.62, 0.4),
                (0.4, 0.3),
                &[Crescent, Triangle],
                Z_TORSO + 5,
                ColourRole::Accent2,
            )
                .with_rotation(20.0),
        )
        .with_part(
            BodyPart::Head,
            PartSpec::new(
                (0.76, 0.44),
                (0.22, 0.2),
                &[Circle, Triangle],
                Z_HEAD,
                ColourRole::Accent1,
            ),
        )
}

pub(super) fn serpentine() -> AnatomicalTemplate {
    AnatomicalTemplate::new("serpentine", Archetype::Serpentine)
        .with_part(BodyPart::Shadow, shadow(0.8))
        .with_part(
            BodyPart::Tail,
            PartSpec::new(
                (0.3, 0.78),
                (0.5, 0.14),
                &[Wave, Capsule],
                Z_LEGS,
                ColourRole::Secondary,
            ),
        )
        .with_part(
            BodyPart::Torso,
            PartSpec::new(
                (0.5, 0.64),
                (0.5, 0.24),
                &[Spiral, Wave, Capsule],
                Z_TORSO,
                ColourRole::Primary,
            ),
        )
        .with_part(
            BodyPart::Head,
            PartSpec::new(
                (0.74, 0.42),
                (0.24, 0.2),
                &[Diamond, Ellipse],
                Z_HEAD,
                ColourRole::Accent1,
            ),
        )
        .with_part(
            BodyPart::Eyes,
            PartSpec::new((0.78, 0.4), (0.1, 0.05), &[Ellipse], Z_HELMET, ColourRole::Highlight2),
        )
}

pub(super) fn arachnid() -> AnatomicalTemplate {
    AnatomicalTemplate::new("arachnid", Archetype::Arachnid)
        .with_part(BodyPart::Shadow, shadow(0.8))
        .with_part(
            BodyPart::LeftLegs,
            PartSpec::new(
                (0.34, 0.68),
                (0.4, 0.36),
                &[Lightning, Cross],
                Z_LEGS,
                ColourRole::Secondary,
            ),
        )
        .with_part(
            BodyPart::RightLegs,
            PartSpec::new(
                (0.66, 0.68),
                (0.4, 0.36),
                &[Lightning, Cross],
                Z_LEGS,
                ColourRole::Secondary,
            ),
        )
        .with_part(
            BodyPart::Abdomen,
            PartSpec::new(
                (0.34, 0.56),
                (0.38, 0.34),
                &[Ellipse, Circle],
                Z_TORSO,
                ColourRole::Primary,
            ),
        )
        .with_part(
            BodyPart::Torso,
            PartSpec::new(
                (0.6, 0.58),
                (0.26, 0.24),
                &[Circle, Ellipse],
                Z_TORSO + 5,
                ColourRole::Primary,
            ),
        )
        .with_part(
            BodyPart::Head,
            PartSpec::new((0.76, 0.56), (0.18, 0.16), &[Circle], Z_HEAD, ColourRole::Accent1),
        )
        .with_part(
            BodyPart::Eyes,
            PartSpec::new((0.8, 0.53), (0.1, 0.05), &[Ellipse], Z_HELMET, ColourRole::Highlight2),
        )
}
