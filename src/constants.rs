// Well-known worksheet columns for the FACES resource directory export

/// Column holding a resource's display name.
pub const NAME_COLUMN: &str = "Name";

/// Suffix marking a boolean-like service flag column, e.g. "Food (Yes or No)".
pub const SERVICE_FLAG_SUFFIX: &str = " (Yes or No)";

/// Free-text column listing services that have no dedicated flag column.
pub const OTHER_SERVICES_COLUMN: &str = "Other (List the other services)";

/// Separator between names in the "Other" column. The worksheet uses the
/// exact two-character sequence; a bare comma does not split.
pub const OTHER_SERVICES_SEPARATOR: &str = ", ";

/// Age-group labels shown by the display layer, in display order.
/// Fixed reference data, independent of the worksheet contents.
pub const AGE_GROUPS: [&str; 7] = [
    "Infants (0-1 year)",
    "Toddlers (1-3 years)",
    "Preschoolers (3-5 years)",
    "Children (5-12 years)",
    "Adolescents (12-18 years)",
    "Young Adults (18-21 years)",
    "Adults (21+ years)",
];

/// Service name for a flag column: the part of the column name before the
/// first occurrence of the flag suffix, or the whole name when the suffix
/// is absent.
pub fn service_name(column: &str) -> &str {
    match column.find(SERVICE_FLAG_SUFFIX) {
        Some(idx) => &column[..idx],
        None => column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_strips_flag_suffix() {
        assert_eq!(service_name("Food (Yes or No)"), "Food");
        assert_eq!(service_name("Health Care (Yes or No)"), "Health Care");
        assert_eq!(service_name("Transportation"), "Transportation");

        // Only the part before the first occurrence counts
        assert_eq!(service_name("Food (Yes or No) (Yes or No)"), "Food");
    }

    #[test]
    fn test_age_groups_are_fixed_reference_data() {
        assert_eq!(AGE_GROUPS.len(), 7);
        assert_eq!(AGE_GROUPS[0], "Infants (0-1 year)");
        assert_eq!(AGE_GROUPS[3], "Children (5-12 years)");
        assert_eq!(AGE_GROUPS[6], "Adults (21+ years)");
    }
}
