//! Boundary to an external keyed store, plus coercion of whatever numeric
//! encoding the store hands back.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// A value as an external store represents it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
}

impl RawValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "bool",
            RawValue::I8(_) => "i8",
            RawValue::I16(_) => "i16",
            RawValue::I32(_) => "i32",
            RawValue::I64(_) => "i64",
            RawValue::F32(_) => "f32",
            RawValue::F64(_) => "f64",
            RawValue::Str(_) => "string",
        }
    }

    /// Any integer or float encoding narrowed to `f32`.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            RawValue::I8(v) => Some(v as f32),
            RawValue::I16(v) => Some(v as f32),
            RawValue::I32(v) => Some(v as f32),
            RawValue::I64(v) => Some(v as f32),
            RawValue::F32(v) => Some(v),
            RawValue::F64(v) => Some(v as f32),
            RawValue::Bool(_) | RawValue::Str(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            RawValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self { RawValue::F32(v) }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self { RawValue::Bool(v) }
}

/// Generic keyed store the skeleton configuration is loaded from and saved to.
pub trait KeyedStore {
    fn get(&self, key: &str) -> Option<RawValue>;
    fn set(&mut self, key: &str, value: RawValue);
}

/// Read a float, treating absent and wrong-typed values alike.
pub(crate) fn read_f32<S: KeyedStore + ?Sized>(store: &S, key: &str) -> Option<f32> {
    let raw = store.get(key)?;
    let v = raw.as_f32();
    if v.is_none() { malformed(key, &raw); }
    v
}

pub(crate) fn read_bool<S: KeyedStore + ?Sized>(store: &S, key: &str) -> Option<bool> {
    let raw = store.get(key)?;
    let v = raw.as_bool();
    if v.is_none() { malformed(key, &raw); }
    v
}

fn malformed(key: &str, raw: &RawValue) {
    let e = ConfigError::MalformedPersistedValue { key: key.to_string(), found: raw.type_name().to_string() };
    log::debug!("{e}, using default");
}

/// In-memory [`KeyedStore`], ordered by key.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, RawValue>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.entries.keys().map(String::as_str) }
    pub fn remove(&mut self, key: &str) -> Option<RawValue> { self.entries.remove(key) }
}

impl KeyedStore for MemoryStore {
    fn get(&self, key: &str) -> Option<RawValue> { self.entries.get(key).cloned() }
    fn set(&mut self, key: &str, value: RawValue) { self.entries.insert(key.to_string(), value); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_encodings_coerce_to_f32() {
        assert_eq!(RawValue::I8(-3).as_f32(), Some(-3.0));
        assert_eq!(RawValue::I16(300).as_f32(), Some(300.0));
        assert_eq!(RawValue::I32(7).as_f32(), Some(7.0));
        assert_eq!(RawValue::I64(1 << 20).as_f32(), Some(1048576.0));
        assert_eq!(RawValue::F64(0.25).as_f32(), Some(0.25));
        assert_eq!(RawValue::Bool(true).as_f32(), None);
        assert_eq!(RawValue::Str("0.5".into()).as_f32(), None);
    }

    #[test]
    fn only_bools_coerce_to_bool() {
        assert_eq!(RawValue::Bool(false).as_bool(), Some(false));
        assert_eq!(RawValue::I32(1).as_bool(), None);
    }

    #[test]
    fn readers_treat_malformed_as_absent() {
        let mut store = MemoryStore::new();
        store.set("a", RawValue::Str("tall".into()));
        store.set("b", RawValue::I64(2));
        assert_eq!(read_f32(&store, "a"), None);
        assert_eq!(read_f32(&store, "b"), Some(2.0));
        assert_eq!(read_f32(&store, "missing"), None);
        assert_eq!(read_bool(&store, "b"), None);
    }
}
