//! Compass bucketing for wind angles.

pub const INVALID_WIND_DIRECTION: &str = "(Invalid wind direction)";

/// Principal directions sitting exactly on a 45° step.
const ORDINARY_DIRECTIONS: [(i32, &str); 8] = [
    (0, "N"),
    (45, "NE"),
    (90, "E"),
    (135, "SE"),
    (180, "S"),
    (225, "SW"),
    (270, "W"),
    (315, "NW"),
];

/// Open intervals between two principal directions.
const SPECIFIC_DIRECTIONS: [(i32, i32, &str); 8] = [
    (0, 45, "NNE"),
    (45, 90, "ENE"),
    (90, 135, "ESE"),
    (135, 180, "SSE"),
    (180, 225, "SSW"),
    (225, 270, "WSW"),
    (270, 315, "WNW"),
    (315, 360, "NNW"),
];

/// Label a wind angle, e.g. `classify(90) == "E (90°)"`.
///
/// Angles outside `[0, 360)` yield [`INVALID_WIND_DIRECTION`].
pub fn classify(angle: i32) -> String {
    let label = ORDINARY_DIRECTIONS
        .iter()
        .find(|(ordinary, _)| *ordinary == angle)
        .map(|(_, label)| *label)
        .or_else(|| {
            SPECIFIC_DIRECTIONS
                .iter()
                .find(|(min, max, _)| *min < angle && angle < *max)
                .map(|(_, _, label)| *label)
        });

    match label {
        Some(label) => format!("{label} ({angle}°)"),
        None => INVALID_WIND_DIRECTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_angles_echo_the_angle() {
        assert_eq!(classify(90), "E (90°)");
        assert_eq!(classify(270), "W (270°)");

        for (angle, label) in ORDINARY_DIRECTIONS {
            assert_eq!(classify(angle), format!("{label} ({angle}°)"));
        }
    }

    #[test]
    fn specific_angles() {
        assert_eq!(classify(169), "SSE (169°)");
        assert_eq!(classify(272), "WNW (272°)");
        assert_eq!(classify(1), "NNE (1°)");
        assert_eq!(classify(359), "NNW (359°)");
    }

    #[test]
    fn out_of_range_angles_are_invalid() {
        assert_eq!(classify(-10), INVALID_WIND_DIRECTION);
        assert_eq!(classify(390), INVALID_WIND_DIRECTION);
        assert_eq!(classify(360), INVALID_WIND_DIRECTION);
    }
}
