use proptest::prelude::*;

use nbt_utils::{format_units, parse_units};

proptest! {
    /// Formatted amounts parse back to the same raw value.
    #[test]
    fn format_then_parse_is_identity(raw in any::<u128>(), decimals in 0u8..=18) {
        let text = format_units(raw, decimals);
        prop_assert_eq!(parse_units(&text, decimals), Ok(raw));
    }

    /// Formatting always yields exactly one decimal point.
    #[test]
    fn formatted_has_single_point(raw in any::<u128>(), decimals in 0u8..=38) {
        let text = format_units(raw, decimals);
        prop_assert_eq!(text.matches('.').count(), 1);
    }
}
