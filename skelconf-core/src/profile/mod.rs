//! YAML-backed profiles.
//!
//! A profile is a nested YAML document; catalog keys such as
//! `body.model.floorClip` address it by dotted path.

pub mod calibration;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::Result;
use crate::persist::{KeyedStore, RawValue};
use crate::rig::SkeletonConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct YamlStore {
    doc: Value,
}

impl Default for YamlStore {
    fn default() -> Self { Self { doc: Value::Mapping(Mapping::new()) } }
}

impl YamlStore {
    pub fn new() -> Self { Self::default() }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::new());
        }
        let doc: Value = serde_yaml::from_str(s)?;
        match doc {
            Value::Null => Ok(Self::new()),
            doc => Ok(Self { doc }),
        }
    }

    /// Load a profile; a missing file is an empty profile.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => Self::from_yaml_str(&data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> { Ok(serde_yaml::to_string(&self.doc)?) }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    /// Deserialize a top-level section, `None` if absent.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.lookup(name) {
            Some(v) => Ok(Some(serde_yaml::from_value(v.clone())?)),
            None => Ok(None),
        }
    }

    pub fn set_section<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        *self.entry_mut(name) = serde_yaml::to_value(value)?;
        Ok(())
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        key.split('.').try_fold(&self.doc, |node, seg| node.as_mapping()?.get(seg))
    }

    // Creates intermediate mappings, replacing scalars that sit in the way.
    fn entry_mut(&mut self, key: &str) -> &mut Value {
        key.split('.').fold(&mut self.doc, |node, seg| {
            if !node.is_mapping() {
                *node = Value::Mapping(Mapping::new());
            }
            match node {
                Value::Mapping(map) => map.entry(Value::from(seg)).or_insert(Value::Null),
                other => other,
            }
        })
    }
}

impl KeyedStore for YamlStore {
    fn get(&self, key: &str) -> Option<RawValue> {
        match self.lookup(key)? {
            Value::Bool(b) => Some(RawValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(RawValue::I64(i))
                } else {
                    n.as_f64().map(RawValue::F64)
                }
            }
            Value::String(s) => Some(RawValue::Str(s.clone())),
            Value::Null => None,
            other => Some(RawValue::Str(format!("{other:?}"))),
        }
    }

    fn set(&mut self, key: &str, value: RawValue) {
        *self.entry_mut(key) = match value {
            RawValue::Bool(b) => Value::Bool(b),
            RawValue::I8(v) => Value::from(v as i64),
            RawValue::I16(v) => Value::from(v as i64),
            RawValue::I32(v) => Value::from(v as i64),
            RawValue::I64(v) => Value::from(v),
            RawValue::F32(v) => Value::from(shortest_f64(v)),
            RawValue::F64(v) => Value::from(v),
            RawValue::Str(s) => Value::String(s),
        };
    }
}

// Widen through the shortest decimal form so 0.26f32 is written as 0.26.
fn shortest_f64(v: f32) -> f64 { v.to_string().parse().unwrap_or(v as f64) }

/// Load a skeleton profile from `path` into a new store.
pub fn load_config<P: AsRef<Path>>(path: P, auto_update: bool) -> Result<SkeletonConfig> {
    let store = YamlStore::load(path)?;
    let mut cfg = SkeletonConfig::new(auto_update);
    cfg.load_from(&store);
    Ok(cfg)
}

/// Write `cfg` into the profile at `path`, keeping unrelated sections intact.
pub fn save_config<P: AsRef<Path>>(cfg: &SkeletonConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut store = YamlStore::load(path)?;
    cfg.save_to(&mut store);
    store.save(path)
}
