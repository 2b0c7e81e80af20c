//! Humanoid body plans: four facings, genre variants, subtypes and equipment.

use crate::types::{ColourRole, Direction, Genre, ShapeKind};

use super::{AnatomicalTemplate, Archetype, BodyPart, PartSpec};

use ShapeKind::*;

pub(super) const Z_SHADOW: i32 = 0;
pub(super) const Z_BEHIND: i32 = 5;
pub(super) const Z_LEGS: i32 = 10;
pub(super) const Z_ARMS_BEHIND: i32 = 15;
pub(super) const Z_TORSO: i32 = 20;
pub(super) const Z_ARMOR: i32 = 25;
pub(super) const Z_ARMS: i32 = 30;
pub(super) const Z_SHIELD: i32 = 35;
pub(super) const Z_HEAD: i32 = 40;
pub(super) const Z_HELMET: i32 = 45;
pub(super) const Z_WEAPON: i32 = 50;

/// The bare humanoid facing `direction`.
pub(super) fn base(direction: Direction) -> AnatomicalTemplate {
    if direction == Direction::Right {
        let mut t = base(Direction::Left).mirrored();
        t.name = "humanoid-right".to_string();
        return t;
    }

    let shadow = PartSpec::new((0.5, 0.93), (0.55, 0.1), &[Ellipse], Z_SHADOW, ColourRole::Shadow)
        .with_opacity(0.8);
    let mut legs = PartSpec::new(
        (0.5, 0.77),
        (0.34, 0.26),
        &[Rectangle, Capsule],
        Z_LEGS,
        ColourRole::Secondary,
    );
    let mut torso = PartSpec::new(
        (0.5, 0.55),
        (0.42, 0.3),
        &[Rectangle, Capsule, Ellipse],
        Z_TORSO,
        ColourRole::Primary,
    );
    let mut arms = PartSpec::new(
        (0.5, 0.55),
        (0.62, 0.22),
        &[Capsule, Rectangle],
        Z_ARMS,
        ColourRole::Secondary,
    );
    let mut head = PartSpec::new(
        (0.5, 0.26),
        (0.3, 0.28),
        &[Circle, Ellipse],
        Z_HEAD,
        ColourRole::Accent1,
    );

    match direction {
        Direction::Up => {
            // Back view: arms tuck behind the torso, hair instead of face.
            arms.z_index = Z_ARMS_BEHIND;
            head.colour_role = ColourRole::Secondary;
        }
        Direction::Left => {
            head.center_x = 0.46;
            torso.width = 0.34;
            legs.width = 0.26;
            arms.width = 0.3;
            arms.rotation = -15.0;
        }
        Direction::Down | Direction::Right => {}
    }

    AnatomicalTemplate::new(format!("humanoid-{}", direction), Archetype::Humanoid)
        .with_part(BodyPart::Shadow, shadow)
        .with_part(BodyPart::Legs, legs)
        .with_part(BodyPart::Torso, torso)
        .with_part(BodyPart::Arms, arms)
        .with_part(BodyPart::Head, head)
}

/// Gaunt humanoid with glowing eyes.
pub(super) fn undead(direction: Direction) -> AnatomicalTemplate {
    let mut t = base(direction);
    t.name = format!("undead-{}", direction);
    t.archetype = Archetype::Undead;

    if let Some(torso) = t.part_mut(BodyPart::Torso) {
        torso.width *= 0.85;
        torso.shapes = vec![Organic, Rectangle];
    }
    if let Some(arms) = t.part_mut(BodyPart::Arms) {
        arms.height *= 0.8;
    }

    if direction != Direction::Up {
        if let Some(head) = t.part(BodyPart::Head).cloned() {
            let eyes = PartSpec::new(
                (head.center_x + direction.side() * 0.03, head.center_y - 0.01),
                (head.width * 0.7, head.height * 0.2),
                &[Ellipse],
                Z_HELMET,
                ColourRole::Highlight2,
            );
            t.set_part(BodyPart::Eyes, eyes);
        }
    }
    t
}

/// Genre silhouettes: angular sci-fi, broad cyberpunk, elongated horror, rugged post-apoc.
pub(super) fn apply_genre(t: &mut AnatomicalTemplate, genre: Genre) {
    match genre {
        Genre::Fantasy => {}
        Genre::SciFi => {
            set_shapes(t, BodyPart::Torso, &[Rectangle, Hexagon]);
            set_shapes(t, BodyPart::Head, &[Hexagon, Rectangle]);
            set_shapes(t, BodyPart::Arms, &[Rectangle]);
        }
        Genre::Cyberpunk => {
            if let Some(arms) = t.part_mut(BodyPart::Arms) {
                arms.width *= 1.2;
            }
            if let Some(torso) = t.part_mut(BodyPart::Torso) {
                torso.width *= 1.1;
                torso.shapes = vec![Rectangle, Diamond];
            }
        }
        Genre::Horror => {
            if let Some(head) = t.part_mut(BodyPart::Head) {
                head.height *= 1.3;
                head.center_y -= 0.03;
            }
            if let Some(torso) = t.part_mut(BodyPart::Torso) {
                torso.width *= 0.85;
                torso.shapes = vec![Organic, Capsule];
            }
        }
        Genre::PostApocalyptic => {
            set_shapes(t, BodyPart::Torso, &[Organic, Rectangle]);
        }
    }
}

/// Entity subtypes: armoured fighters, hatted casters, winged angels, slim rogues.
pub(super) fn apply_subtype(t: &mut AnatomicalTemplate, entity_type: &str, direction: Direction) {
    let Some(head) = t.part(BodyPart::Head).cloned() else {
        return;
    };
    match entity_type.trim().to_ascii_lowercase().as_str() {
        "knight" | "warrior" | "paladin" | "soldier" | "guard" => {
            let helmet = PartSpec::new(
                (head.center_x, head.center_y - head.height * 0.2),
                (head.width * 1.1, head.height * 0.6),
                &[Crescent, Circle],
                Z_HELMET,
                ColourRole::Accent3,
            );
            t.set_part(BodyPart::Helmet, helmet);
            if let Some(torso) = t.part(BodyPart::Torso).cloned() {
                let armor = PartSpec {
                    width: (torso.width * 1.05).min(1.0),
                    height: torso.height * 0.9,
                    z_index: Z_ARMOR,
                    colour_role: ColourRole::Secondary,
                    opacity: 0.85,
                    ..torso
                }
                .with_shapes(&[Rectangle]);
                t.set_part(BodyPart::Armor, armor);
            }
        }
        "mage" | "wizard" | "sorcerer" | "witch" => {
            let hat = PartSpec::new(
                (head.center_x, (head.center_y - head.height * 0.55).max(0.0)),
                (head.width * 1.1, head.height * 0.8),
                &[Triangle],
                Z_HELMET,
                ColourRole::Accent3,
            );
            t.set_part(BodyPart::Helmet, hat);
        }
        "angel" | "fairy" => {
            let z = if direction == Direction::Up { Z_SHIELD } else { Z_BEHIND };
            let wings = PartSpec::new(
                (0.5, 0.45),
                (0.9, 0.35),
                &[Crescent, Ellipse],
                z,
                ColourRole::Highlight2,
            )
            .with_opacity(0.85);
            t.set_part(BodyPart::Wings, wings);
        }
        "rogue" | "thief" | "assassin" => {
            for (part, factor) in [
                (BodyPart::Torso, 0.85),
                (BodyPart::Arms, 0.9),
                (BodyPart::Legs, 0.85),
            ] {
                if let Some(spec) = t.part_mut(part) {
                    spec.width *= factor;
                }
            }
        }
        _ => {}
    }
}

/// Attach a weapon and/or shield placed for the facing.
pub(super) fn add_equipment(
    t: &mut AnatomicalTemplate,
    direction: Direction,
    has_weapon: bool,
    has_shield: bool,
) {
    if has_weapon {
        t.set_part(BodyPart::Weapon, weapon(direction));
    }
    if has_shield {
        t.set_part(BodyPart::Shield, shield(direction));
    }
}

fn weapon(direction: Direction) -> PartSpec {
    let spec = PartSpec::new(
        (0.78, 0.56),
        (0.12, 0.46),
        &[Blade, Rectangle],
        Z_WEAPON,
        ColourRole::Highlight1,
    );
    match direction {
        Direction::Down => spec,
        Direction::Up => PartSpec {
            center_x: 0.22,
            center_y: 0.5,
            z_index: Z_BEHIND,
            ..spec
        },
        Direction::Left => PartSpec {
            center_x: 0.3,
            center_y: 0.55,
            ..spec
        }
        .with_rotation(-30.0),
        Direction::Right => weapon(Direction::Left).mirrored(),
    }
}

fn shield(direction: Direction) -> PartSpec {
    let spec = PartSpec::new(
        (0.24, 0.58),
        (0.26, 0.3),
        &[Hexagon, Circle, Diamond],
        Z_SHIELD,
        ColourRole::Accent2,
    );
    match direction {
        Direction::Down => spec,
        Direction::Up => PartSpec {
            center_x: 0.76,
            center_y: 0.55,
            z_index: Z_BEHIND,
            ..spec
        },
        // Shield arm is the far arm when facing sideways.
        Direction::Left => PartSpec {
            center_x: 0.62,
            center_y: 0.58,
            width: 0.14,
            height: 0.32,
            z_index: Z_BEHIND,
            ..spec
        },
        Direction::Right => shield(Direction::Left).mirrored(),
    }
}

fn set_shapes(t: &mut AnatomicalTemplate, part: BodyPart, shapes: &[ShapeKind]) {
    if let Some(spec) = t.part_mut(part) {
        spec.shapes = shapes.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_mirrors_left() {
        let left = base(Direction::Left);
        let right = base(Direction::Right);
        let lh = left.part(BodyPart::Head).unwrap();
        let rh = right.part(BodyPart::Head).unwrap();
        assert!((rh.center_x - 0.54).abs() < 1e-9);
        assert!(lh.center_x < 0.5);
        assert_eq!(right.part(BodyPart::Arms).unwrap().rotation, 15.0);
        assert_eq!(right.name, "humanoid-right");
    }

    #[test]
    fn test_back_view_arms_behind_torso() {
        let t = base(Direction::Up);
        let arms = t.part(BodyPart::Arms).unwrap();
        let torso = t.part(BodyPart::Torso).unwrap();
        assert!(arms.z_index < torso.z_index);
    }

    #[test]
    fn test_equipment_behind_body_when_facing_up() {
        let mut t = base(Direction::Up);
        add_equipment(&mut t, Direction::Up, true, true);
        let torso_z = t.part(BodyPart::Torso).unwrap().z_index;
        assert!(t.part(BodyPart::Weapon).unwrap().z_index < torso_z);
        assert!(t.part(BodyPart::Shield).unwrap().z_index < torso_z);

        let mut t = base(Direction::Down);
        add_equipment(&mut t, Direction::Down, true, false);
        assert_eq!(t.part(BodyPart::Weapon).unwrap().z_index, Z_WEAPON);
        assert!(!t.has_part(BodyPart::Shield));
    }

    #[test]
    fn test_undead_eyes_hidden_from_behind() {
        assert!(undead(Direction::Down).has_part(BodyPart::Eyes));
        assert!(!undead(Direction::Up).has_part(BodyPart::Eyes));
    }

    #[test]
    fn test_horror_elongates_head() {
        let mut t = base(Direction::Down);
        let before = t.part(BodyPart::Head).unwrap().height;
        apply_genre(&mut t, Genre::Horror);
        assert!(t.part(BodyPart::Head).unwrap().height > before);
    }

    #[test]
    fn test_subtypes() {
        let mut knight = base(Direction::Down);
        apply_subtype(&mut knight, "Knight", Direction::Down);
        assert!(knight.has_part(BodyPart::Helmet));
        assert!(knight.has_part(BodyPart::Armor));

        let mut mage = base(Direction::Down);
        apply_subtype(&mut mage, "wizard", Direction::Down);
        assert_eq!(mage.part(BodyPart::Helmet).unwrap().shapes, vec![Triangle]);

        let mut angel = base(Direction::Down);
        apply_subtype(&mut angel, "angel", Direction::Down);
        assert_eq!(angel.part(BodyPart::Wings).unwrap().z_index, Z_BEHIND);
    }
}
