//! Boss variants: uniform scaling about the sprite centre and an armor overlay.

use crate::types::{ColourRole, ShapeKind};

use super::{AnatomicalTemplate, BodyPart, PartSpec};

pub(super) fn scale_template(base: &AnatomicalTemplate, scale: f64) -> AnatomicalTemplate {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let mut t = base.clone();
    t.name = format!("{}-boss", base.name);
    if scale != 1.0 {
        t.map_parts(|_, spec| *spec = spec.scaled_about_center(scale));
    }
    t
}

pub(super) fn enhance(template: &AnatomicalTemplate) -> AnatomicalTemplate {
    let mut t = template.clone();
    if t.has_part(BodyPart::Armor) {
        return t;
    }
    if let Some(torso) = t.part(BodyPart::Torso).cloned() {
        let armor = torso
            .scaled_size(1.2)
            .with_shapes(&[ShapeKind::Rectangle, ShapeKind::Hexagon])
            .with_opacity(0.9);
        t.set_part(
            BodyPart::Armor,
            PartSpec {
                z_index: torso.z_index - 1,
                colour_role: ColourRole::Accent2,
                ..armor
            },
        );
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateLibrary;
    use crate::types::Direction;

    #[test]
    fn test_scale_about_center() {
        let base = TemplateLibrary::humanoid_with_equipment(Direction::Down, false, false);
        let boss = scale_template(&base, 2.0);
        let head = base.part(BodyPart::Head).unwrap();
        let big = boss.part(BodyPart::Head).unwrap();

        assert!((big.width - head.width * 2.0).abs() < 1e-12);
        assert!((big.center_y - (0.5 + (head.center_y - 0.5) * 2.0)).abs() < 1e-12);
        assert_eq!(boss.name, "humanoid-down-boss");
    }

    #[test]
    fn test_non_positive_scale_is_identity() {
        let base = TemplateLibrary::select_template("wolf");
        for scale in [0.0, -3.0, f64::NAN] {
            let boss = scale_template(&base, scale);
            assert_eq!(boss.part(BodyPart::Torso), base.part(BodyPart::Torso));
        }
    }

    #[test]
    fn test_enhance_adds_armor_behind_torso() {
        let base = TemplateLibrary::select_template("humanoid");
        let enhanced = enhance(&base);
        let torso = enhanced.part(BodyPart::Torso).unwrap();
        let armor = enhanced.part(BodyPart::Armor).unwrap();

        assert_eq!(armor.z_index, torso.z_index - 1);
        assert!((armor.width - torso.width * 1.2).abs() < 1e-12);
        assert_eq!(armor.colour_role, ColourRole::Accent2);
    }

    #[test]
    fn test_enhance_keeps_existing_armor() {
        let knight = TemplateLibrary::select_humanoid_template("fantasy", "knight", Direction::Down);
        let enhanced = enhance(&knight);
        assert_eq!(enhanced.part(BodyPart::Armor), knight.part(BodyPart::Armor));
    }
}
