//! Positioned vs. phantom classification of legacy fields.

use praxis_types::LegacyField;

/// Whether a legacy field occupies space on the rendered page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldClass {
    /// Has a real on-page box.
    Positioned,
    /// Zero-area: parked off-document by the form designer, renders nowhere.
    Phantom,
}

/// Classify a legacy field by its box: phantom iff width or height is zero.
///
/// Computed once at migration time. The classification is one-way: a
/// phantom block never carries geometry again.
pub fn classify(field: &LegacyField) -> FieldClass {
    if field.w == 0.0 || field.h == 0.0 {
        FieldClass::Phantom
    } else {
        FieldClass::Positioned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with_box(w: f64, h: f64) -> LegacyField {
        serde_json::from_value(serde_json::json!({
            "field": "f",
            "x": 5, "y": 5, "w": w, "h": h, "page": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_zero_width_is_phantom() {
        assert_eq!(classify(&field_with_box(0.0, 14.0)), FieldClass::Phantom);
    }

    #[test]
    fn test_zero_height_is_phantom() {
        assert_eq!(classify(&field_with_box(120.0, 0.0)), FieldClass::Phantom);
    }

    #[test]
    fn test_zero_both_is_phantom() {
        assert_eq!(classify(&field_with_box(0.0, 0.0)), FieldClass::Phantom);
    }

    #[test]
    fn test_tiny_box_is_positioned() {
        assert_eq!(classify(&field_with_box(0.1, 0.1)), FieldClass::Positioned);
    }

    #[test]
    fn test_normal_box_is_positioned() {
        assert_eq!(classify(&field_with_box(180.0, 14.0)), FieldClass::Positioned);
    }
}
