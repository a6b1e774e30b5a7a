use serde::{Deserialize, Deserializer};

/// Tri-state value for PATCH payloads: a field that is absent means "leave
/// unchanged", an explicit `null` (or empty string, via `cleared_text`) means
/// "clear", and a value means "set".
///
/// Must be paired with `#[serde(default)]` on the field so a missing key
/// deserializes to `Absent` rather than failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Resolves against the current value: `Absent` keeps it, `Null` clears
    /// it, `Value` replaces it.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Absent => current,
            Self::Null => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl Patch<String> {
    /// Text fields treat whitespace-only input the same as `null`.
    pub fn cleared_text(self) -> Patch<String> {
        match self {
            Self::Value(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Self::Null
                } else {
                    Self::Value(trimmed.to_string())
                }
            }
            other => other,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct CarPatch {
        #[serde(default)]
        plate_number: Patch<String>,
        #[serde(default)]
        year: Patch<i32>,
    }

    #[test]
    fn absent_field_is_left_unchanged() {
        let patch: CarPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(patch.plate_number, Patch::Absent);
        assert_eq!(patch.year, Patch::Absent);
        assert_eq!(
            patch.plate_number.apply(Some("A123".into())),
            Some("A123".to_string())
        );
    }

    #[test]
    fn null_clears() {
        let patch: CarPatch =
            serde_json::from_str(r#"{"plate_number": null, "year": null}"#).unwrap();
        assert_eq!(patch.plate_number, Patch::Null);
        assert_eq!(patch.year.apply(Some(2020)), None);
    }

    #[test]
    fn value_replaces() {
        let patch: CarPatch =
            serde_json::from_str(r#"{"plate_number": " B777 ", "year": 2021}"#).unwrap();
        assert_eq!(
            patch.plate_number.cleared_text(),
            Patch::Value("B777".to_string())
        );
        assert_eq!(patch.year.apply(None), Some(2021));
    }

    #[test]
    fn empty_string_counts_as_clear() {
        let patch: CarPatch = serde_json::from_str(r#"{"plate_number": "  "}"#).unwrap();
        assert_eq!(patch.plate_number.cleared_text(), Patch::Null);
    }
}
