//! Presentation binder
//!
//! Every page decorates its records with an icon, a color token and a label
//! looked up from the record's category. The lookup tables are closed enums
//! (`CategoryTable`) so the set of known categories is fixed at compile time;
//! each table names one fallback variant that absorbs keys the server sends
//! but the client does not know yet.
//!
//! Records hold their category as a `CategoryKey`, which keeps the server's
//! key verbatim and only resolves it against the table for display. Editing
//! a record with an unknown category therefore writes the same key back.

use crate::traits::JourneyRecord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Display metadata for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Presentation {
    /// Icon reference understood by the icon set (e.g. "plane")
    pub icon: &'static str,
    /// Color token from the design system (e.g. "sky-500")
    pub color: &'static str,
    /// Human readable label
    pub label: &'static str,
}

impl Presentation {
    pub const fn new(icon: &'static str, color: &'static str, label: &'static str) -> Self {
        Self { icon, color, label }
    }
}

/// A closed category set with a total key mapping.
///
/// Implementors are plain fieldless enums. `from_key` must never fail: keys it
/// does not recognize map to `FALLBACK`.
pub trait CategoryTable: Copy + Eq + Send + Sync + 'static {
    /// Variant used for unknown or missing keys
    const FALLBACK: Self;

    /// All variants in display order (used to build filter menus)
    fn all() -> &'static [Self];

    /// Wire key for this variant
    fn key(&self) -> &'static str;

    /// Static display metadata for this variant
    fn presentation(&self) -> Presentation;

    /// Total mapping from a wire key, case-insensitive
    fn from_key(key: &str) -> Self {
        let key = key.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(key))
            .unwrap_or(Self::FALLBACK)
    }

    /// Whether the key names a known variant other than through the fallback
    fn is_known(key: &str) -> bool {
        let key = key.trim();
        Self::all()
            .iter()
            .any(|c| c.key().eq_ignore_ascii_case(key))
    }
}

/// A category key as stored on the backend, resolved lazily against table `C`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey<C> {
    key: String,
    table: PhantomData<fn() -> C>,
}

impl<C: CategoryTable> CategoryKey<C> {
    /// Wrap a raw key; unknown keys are kept as given
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            table: PhantomData,
        }
    }

    /// The key exactly as the backend sent it
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Table variant for this key, `C::FALLBACK` when unknown
    pub fn resolve(&self) -> C {
        C::from_key(&self.key)
    }

    pub fn is_known(&self) -> bool {
        C::is_known(&self.key)
    }

    pub fn presentation(&self) -> Presentation {
        self.resolve().presentation()
    }
}

impl<C: CategoryTable> From<C> for CategoryKey<C> {
    fn from(category: C) -> Self {
        Self::new(category.key())
    }
}

impl<C: CategoryTable + Default> Default for CategoryKey<C> {
    fn default() -> Self {
        C::default().into()
    }
}

/// Compares keys, so an unknown key never equals the fallback variant
impl<C: CategoryTable> PartialEq<C> for CategoryKey<C> {
    fn eq(&self, other: &C) -> bool {
        self.key.trim().eq_ignore_ascii_case(other.key())
    }
}

impl<C> fmt::Display for CategoryKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl<C> Serialize for CategoryKey<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key)
    }
}

impl<'de, C> Deserialize<'de> for CategoryKey<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Self {
            key,
            table: PhantomData,
        })
    }
}

/// Resolve display metadata for any string key.
///
/// Total over all inputs: unknown keys resolve to the table's fallback entry.
pub fn resolve_presentation<C: CategoryTable>(key: &str) -> Presentation {
    C::from_key(key).presentation()
}

/// A record paired with the presentation of its category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decorated<'a, R> {
    pub record: &'a R,
    pub presentation: Presentation,
}

/// Decorate each record in order
pub fn decorate<'a, R: JourneyRecord>(records: &[&'a R]) -> Vec<Decorated<'a, R>> {
    records
        .iter()
        .map(|record| Decorated {
            record: *record,
            presentation: record.category().presentation(),
        })
        .collect()
}

/// Filter menu entries for a table: `(key, presentation)` in display order
pub fn menu<C: CategoryTable>() -> Vec<(&'static str, Presentation)> {
    C::all()
        .iter()
        .map(|c| (c.key(), c.presentation()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::memory::MemoryCategory;

    #[test]
    fn test_resolve_known_key() {
        let p = resolve_presentation::<MemoryCategory>("travel");
        assert_eq!(p.label, "Travel");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(
            resolve_presentation::<MemoryCategory>(" TRAVEL "),
            resolve_presentation::<MemoryCategory>("travel")
        );
    }

    #[test]
    fn test_unknown_keys_fall_back() {
        let fallback = MemoryCategory::FALLBACK.presentation();
        for key in ["", "spaceflight", "🚀", "travel-ish", "\0"] {
            assert_eq!(resolve_presentation::<MemoryCategory>(key), fallback, "key {:?}", key);
        }
        assert!(!MemoryCategory::is_known("spaceflight"));
    }

    #[test]
    fn test_category_key_keeps_unknown_keys() {
        let key: CategoryKey<MemoryCategory> = serde_json::from_str(r#""honeymoon""#).unwrap();
        assert_eq!(key.as_str(), "honeymoon");
        assert_eq!(key.resolve(), MemoryCategory::Other);
        assert!(!key.is_known());
        assert_ne!(key, MemoryCategory::Other);
        assert_eq!(key.presentation(), MemoryCategory::Other.presentation());
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""honeymoon""#);
    }

    #[test]
    fn test_category_key_from_variant() {
        let key = CategoryKey::from(MemoryCategory::Travel);
        assert_eq!(key.as_str(), "travel");
        assert_eq!(key, MemoryCategory::Travel);
        assert_eq!(CategoryKey::<MemoryCategory>::new("TRAVEL"), MemoryCategory::Travel);
        assert_eq!(CategoryKey::<MemoryCategory>::default(), MemoryCategory::default());
    }

    #[test]
    fn test_menu_lists_every_variant() {
        assert_eq!(menu::<MemoryCategory>().len(), MemoryCategory::all().len());
    }
}
