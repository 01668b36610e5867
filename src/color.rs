use regex::Regex;
use tracing::warn;

/// Hex color forms the map styles accept: `#rgb`, `#rrggbb`, `#rrggbbaa`.
const HEX_COLOR_PATTERN: &str = "^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$";

pub fn is_valid_hex_color(input: &str) -> bool {
    Regex::new(HEX_COLOR_PATTERN)
        .map(|re| re.is_match(input))
        .unwrap_or(false)
}

/// Returns `input` when it is a usable color, otherwise logs the rejected
/// value and falls back to `default`.
pub fn color_or_default(input: Option<&str>, default: &str) -> String {
    match input {
        Some(value) if is_valid_hex_color(value) => value.to_string(),
        Some(value) => {
            warn!(target: "render", "ignoring invalid color {:?}, using {}", value, default);
            default.to_string()
        }
        None => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_three_six_and_eight_digit_forms() {
        assert!(is_valid_hex_color("#f00"));
        assert!(is_valid_hex_color("#3388ff"));
        assert!(is_valid_hex_color("#ff0000aa"));
        assert!(is_valid_hex_color("#ABCDEF"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_valid_hex_color("3388ff"));
        assert!(!is_valid_hex_color("#33"));
        assert!(!is_valid_hex_color("#12345"));
        assert!(!is_valid_hex_color("#gggggg"));
        assert!(!is_valid_hex_color("red"));
        assert!(!is_valid_hex_color(""));
    }

    #[test]
    fn falls_back_to_default_for_missing_or_invalid_input() {
        assert_eq!(color_or_default(Some("#00ff00"), "#ff0000"), "#00ff00");
        assert_eq!(color_or_default(Some("green"), "#ff0000"), "#ff0000");
        assert_eq!(color_or_default(None, "#ff0000"), "#ff0000");
    }
}
