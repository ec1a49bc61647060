//! Deducting consumed ingredients from a user's food inventory.
//!
//! Quantities are stored as decimal strings. A quantity descriptor such as
//! `"150g"`, `"1kg"` or `"2"` contributes only its leading digits; the unit
//! suffix is not converted.

use std::collections::BTreeMap;

use crate::error::UpdateError;

const DRY_MARKER: &str = "(dry)";

pub(crate) fn normalize_ingredient(name: &str) -> String {
    name.replace(DRY_MARKER, "").trim_end().to_string()
}

/// Leading run of ASCII digits in `descriptor`, or `None` when it doesn't
/// start with a digit.
fn leading_digits(descriptor: &str) -> Option<&str> {
    let end = descriptor
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(descriptor.len());
    (end > 0).then(|| &descriptor[..end])
}

/// Amount consumed according to `descriptor`. Descriptors with no leading
/// digits consume nothing; `None` means the digits overflow an `i64`.
pub(crate) fn parse_used_quantity(descriptor: &str) -> Option<i64> {
    match leading_digits(descriptor) {
        Some(digits) => digits.parse().ok(),
        None => Some(0),
    }
}

/// Returns `stored` with every consumed ingredient it already knows about
/// reduced by the used amount. Unknown ingredients are skipped and the result
/// may go negative.
pub(crate) fn deduct(
    stored: &BTreeMap<String, String>,
    consumed: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, UpdateError> {
    let mut updated = stored.clone();

    for (name, descriptor) in consumed {
        let ingredient = normalize_ingredient(name);
        let Some(available) = updated.get(&ingredient) else {
            log::debug!("{ingredient} is not in the inventory, skipping");
            continue;
        };

        let out_of_range = || UpdateError::QuantityOutOfRange {
            ingredient: ingredient.clone(),
            descriptor: descriptor.clone(),
        };

        let used = parse_used_quantity(descriptor).ok_or_else(out_of_range)?;
        let available: i64 =
            available
                .trim()
                .parse()
                .map_err(|_| UpdateError::InvalidStoredQuantity {
                    ingredient: ingredient.clone(),
                    value: available.clone(),
                })?;
        let remaining = available.checked_sub(used).ok_or_else(out_of_range)?;

        log::debug!("{ingredient}: {available} - {used} = {remaining}");
        updated.insert(ingredient.clone(), remaining.to_string());
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn dry_marker_is_stripped_before_lookup() {
        let result = deduct(&map(&[("rice", "500")]), &map(&[("rice(dry)", "150g")])).unwrap();
        assert_eq!(result, map(&[("rice", "350")]));
    }

    #[test]
    fn unitless_quantity_counts_units() {
        let result = deduct(&map(&[("egg", "6")]), &map(&[("egg", "2")])).unwrap();
        assert_eq!(result, map(&[("egg", "4")]));
    }

    #[test]
    fn unknown_ingredient_leaves_inventory_unchanged() {
        let result = deduct(&map(&[("flour", "1000")]), &map(&[("sugar", "100g")])).unwrap();
        assert_eq!(result, map(&[("flour", "1000")]));
    }

    #[test]
    fn kilogram_suffix_does_not_scale() {
        let result = deduct(&map(&[("potato", "5")]), &map(&[("potato", "1kg")])).unwrap();
        assert_eq!(result, map(&[("potato", "4")]));
    }

    #[test]
    fn descriptor_without_digits_consumes_nothing() {
        let result = deduct(&map(&[("salt", "100")]), &map(&[("salt", "abc")])).unwrap();
        assert_eq!(result, map(&[("salt", "100")]));
    }

    #[test]
    fn deduction_may_go_negative() {
        let result = deduct(&map(&[("milk", "100")]), &map(&[("milk", "250g")])).unwrap();
        assert_eq!(result, map(&[("milk", "-150")]));
    }

    #[test]
    fn spaced_dry_marker_is_normalized() {
        assert_eq!(normalize_ingredient("lentils (dry)"), "lentils");
        assert_eq!(normalize_ingredient("oats"), "oats");
    }

    #[test]
    fn parse_used_quantity_reads_leading_digits() {
        assert_eq!(parse_used_quantity("150g"), Some(150));
        assert_eq!(parse_used_quantity("2"), Some(2));
        assert_eq!(parse_used_quantity("g150"), Some(0));
        assert_eq!(parse_used_quantity(""), Some(0));
        assert_eq!(parse_used_quantity("99999999999999999999g"), None);
    }

    #[test]
    fn non_numeric_stored_quantity_is_an_error() {
        let err = deduct(&map(&[("egg", "six")]), &map(&[("egg", "2")])).unwrap_err();
        assert!(matches!(
            err,
            UpdateError::InvalidStoredQuantity { ref ingredient, ref value }
                if ingredient == "egg" && value == "six"
        ));
    }

    #[test]
    fn non_numeric_stored_quantity_is_ignored_when_not_consumed() {
        let stored = map(&[("egg", "six"), ("rice", "10")]);
        let result = deduct(&stored, &map(&[("rice", "3")])).unwrap();
        assert_eq!(result, map(&[("egg", "six"), ("rice", "7")]));
    }

    #[test]
    fn overflowing_descriptor_is_an_error() {
        let err = deduct(&map(&[("egg", "6")]), &map(&[("egg", "99999999999999999999")])).unwrap_err();
        assert!(matches!(err, UpdateError::QuantityOutOfRange { .. }));
    }

    proptest! {
        #[test]
        fn never_adds_ingredients(
            stored in prop::collection::btree_map("[a-m]{1,6}", (0i64..10_000).prop_map(|n| n.to_string()), 0..8),
            consumed in prop::collection::btree_map("[n-z]{1,6}", "[0-9]{0,4}[gk]{0,2}", 0..8),
        ) {
            let result = deduct(&stored, &consumed).unwrap();
            prop_assert_eq!(result, stored);
        }

        #[test]
        fn known_ingredient_is_decremented_by_leading_integer(
            available in 0i64..100_000,
            used in 0i64..100_000,
            unit in prop::sample::select(vec!["", "g", "kg"]),
            dry in any::<bool>(),
        ) {
            let stored = map(&[("rice", available.to_string().as_str())]);
            let key = if dry { "rice(dry)" } else { "rice" };
            let consumed = map(&[(key, format!("{used}{unit}").as_str())]);

            let result = deduct(&stored, &consumed).unwrap();

            prop_assert_eq!(result.len(), 1);
            prop_assert_eq!(&result["rice"], &(available - used).to_string());
        }
    }
}
