//! Allow-list validators for integers and strings.

use std::collections::BTreeSet;

use crate::foundation::ValidationError;

fn joined<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

// ============================================================================
// ALLOWED INTEGERS
// ============================================================================

crate::validator! {
    /// Accepts only integers from a fixed set.
    #[derive(PartialEq, Eq)]
    pub AllowedIntegers { values: BTreeSet<i64> } for i64;
    rule(self, input) { self.values.contains(input) }
    error(self, input) {
        ValidationError::new("not_allowed", format!("{input} is not an allowed value"))
            .with_param("allowed", joined(&self.values))
            .with_param("actual", input.to_string())
    }
    new(values: impl IntoIterator<Item = i64>) {
        Self { values: values.into_iter().collect() }
    }
    fn allowed_integers(values: impl IntoIterator<Item = i64>);
}

// ============================================================================
// ALLOWED STRINGS
// ============================================================================

crate::validator! {
    /// Accepts only strings from a fixed set (case-sensitive).
    #[derive(PartialEq, Eq)]
    pub AllowedStrings { values: BTreeSet<String> } for str;
    rule(self, input) { self.values.contains(input) }
    error(self, input) {
        ValidationError::new("not_allowed", format!("`{input}` is not an allowed value"))
            .with_param("allowed", joined(&self.values))
            .with_param("actual", input.to_owned())
    }
    new(values: impl IntoIterator<Item = impl Into<String>>) {
        Self { values: values.into_iter().map(Into::into).collect() }
    }
    fn allowed_strings(values: impl IntoIterator<Item = impl Into<String>>);
}
