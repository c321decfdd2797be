/// Compact display of an item value: "1.5B", "860M", "2.5K", "999"
///
/// One decimal place, with a trailing ".0" dropped.
pub fn format_value(value: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

    for (scale, suffix) in UNITS {
        if value >= scale {
            // Round half up to one decimal in integer arithmetic
            let tenths = (value as u128 * 10 + scale as u128 / 2) / scale as u128;
            let (whole, fraction) = (tenths / 10, tenths % 10);
            return if fraction == 0 {
                format!("{whole}{suffix}")
            } else {
                format!("{whole}.{fraction}{suffix}")
            };
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0), "0");
        assert_eq!(format_value(999), "999");
        assert_eq!(format_value(7_500), "7.5K");
        assert_eq!(format_value(50_000), "50K");
        assert_eq!(format_value(860_000_000), "860M");
        assert_eq!(format_value(1_000_000_000), "1B");
        assert_eq!(format_value(2_300_000_000), "2.3B");
        assert_eq!(format_value(1_250_000), "1.3M");
    }
}
