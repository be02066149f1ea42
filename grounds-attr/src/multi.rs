//! Comma-joined multi-valued fields.
//!
//! Lists of player or role names are stored as a single `STRING` attribute
//! whose value is the members joined by `,`. Names never contain commas.

/// Joins names with `,`. An empty slice yields an empty string.
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits a comma-joined value. An empty value yields no names, never a
/// single empty name.
pub fn split_names(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}

/// Whether `name` can be stored in a comma-joined field: non-empty and
/// free of commas.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(',')
}
