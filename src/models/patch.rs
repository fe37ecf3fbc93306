use serde::{Deserialize, Deserializer};

/// Tri-state field update carried by PUT bodies.
///
/// Use with `#[serde(default)]` so that an absent key becomes [`Patch::Keep`];
/// an explicit JSON `null` becomes [`Patch::Clear`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    /// Resolve against the stored value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(v) => Some(v),
        }
    }

    /// Convert a set value, keeping `Keep` and `Clear` as they are.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Self::Keep => Patch::Keep,
            Self::Clear => Patch::Clear,
            Self::Set(v) => Patch::Set(f(v)?),
        })
    }
}

impl Patch<String> {
    /// Trim the value; a blank string clears the field.
    pub fn normalize_text(self) -> Self {
        match self {
            Self::Set(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Self::Clear
                } else {
                    Self::Set(trimmed.to_string())
                }
            }
            other => other,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        notes: Patch<String>,
    }

    #[test]
    fn test_absent_null_and_value() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.notes, Patch::Keep);

        let null: Body = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(null.notes, Patch::Clear);

        let set: Body = serde_json::from_str(r#"{"notes": "hi"}"#).unwrap();
        assert_eq!(set.notes, Patch::Set("hi".to_string()));
    }

    #[test]
    fn test_apply() {
        let current = Some("old".to_string());
        assert_eq!(Patch::Keep.apply(current.clone()), current);
        assert_eq!(Patch::<String>::Clear.apply(current.clone()), None);
        assert_eq!(
            Patch::Set("new".to_string()).apply(current),
            Some("new".to_string())
        );
    }

    #[test]
    fn test_try_map_converts_only_set() {
        let parse = |s: String| s.parse::<i64>();
        assert_eq!(Patch::Set("7".to_string()).try_map(parse), Ok(Patch::Set(7)));
        assert_eq!(Patch::<String>::Clear.try_map(parse), Ok(Patch::Clear));
        assert_eq!(Patch::<String>::Keep.try_map(parse), Ok(Patch::Keep));
        assert!(Patch::Set("seven".to_string()).try_map(parse).is_err());
    }

    #[test]
    fn test_blank_text_clears() {
        assert_eq!(
            Patch::Set("   ".to_string()).normalize_text(),
            Patch::Clear
        );
        assert_eq!(
            Patch::Set(" x ".to_string()).normalize_text(),
            Patch::Set("x".to_string())
        );
        assert_eq!(Patch::<String>::Keep.normalize_text(), Patch::Keep);
    }
}
