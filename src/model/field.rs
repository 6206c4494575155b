//! # Three-State Fields
//!
//! Update payloads must tell apart a key that was never sent from a key sent
//! as `null`. `Option<T>` collapses the two, so update paths carry a
//! [`Field`] instead.

/// Presence of a single field in an update payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field<T> {
    /// Key absent from the payload: leave the stored value alone.
    #[default]
    Missing,

    /// Key present with an explicit `null`: clear the stored value.
    Null,

    /// Key present with a value: replace the stored value.
    Value(T),
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    /// Resolve against the current value: missing keeps it, null clears it.
    pub fn apply_to(self, current: Option<T>) -> Option<T> {
        match self {
            Field::Missing => current,
            Field::Null => None,
            Field::Value(v) => Some(v),
        }
    }
}
