//! Sparse skeleton configuration with derived node offsets.
//!
//! Overrides are kept per parameter family; anything not overridden reads as
//! its catalog default. When auto-update is on, changing a proportion
//! recomputes only the nodes that depend on it, while bulk operations defer
//! recomputation to a single pass at the end.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;

use crate::catalog::{BoneNode, OffsetParam, ToggleParam, ValueParam};
use crate::error::ConfigError;
use crate::notify::{guarded, ConfigObserver, FaultSink, LogFaultSink, ObserverResult};
use crate::persist::{read_bool, read_f32, KeyedStore, RawValue};

use super::offsets::{self, NodeOffsets};

/// Explicitly set parameter values. Absence means "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub offsets: BTreeMap<OffsetParam, f32>,
    pub toggles: BTreeMap<ToggleParam, bool>,
    pub values: BTreeMap<ValueParam, f32>,
}

impl Overrides {
    pub fn new() -> Self { Self::default() }

    pub fn offset(mut self, param: OffsetParam, value: f32) -> Self { self.offsets.insert(param, value); self }
    pub fn toggle(mut self, param: ToggleParam, value: bool) -> Self { self.toggles.insert(param, value); self }
    pub fn value(mut self, param: ValueParam, value: f32) -> Self { self.values.insert(param, value); self }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty() && self.toggles.is_empty() && self.values.is_empty()
    }

    pub fn len(&self) -> usize { self.offsets.len() + self.toggles.len() + self.values.len() }

    pub fn clear(&mut self) {
        self.offsets.clear();
        self.toggles.clear();
        self.values.clear();
    }
}

pub struct SkeletonConfig {
    overrides: Overrides,
    node_offsets: NodeOffsets,
    auto_update: bool,
    observer: Option<Box<dyn ConfigObserver>>,
    faults: Box<dyn FaultSink>,
}

impl fmt::Debug for SkeletonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkeletonConfig")
            .field("overrides", &self.overrides)
            .field("auto_update", &self.auto_update)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl SkeletonConfig {
    /// All defaults, no observer.
    pub fn new(auto_update: bool) -> Self { Self::builder().auto_update(auto_update).build() }

    pub fn builder() -> SkeletonConfigBuilder { SkeletonConfigBuilder::new() }

    pub fn auto_update(&self) -> bool { self.auto_update }

    /// Current overrides only; use the getters for effective values.
    pub fn overrides(&self) -> &Overrides { &self.overrides }

    // ---- offsets ---------------------------------------------------------

    /// Set (`Some`) or remove (`None`) an offset override, returning the previous override.
    ///
    /// With `recompute` and auto-update, only `param.affected_nodes()` are recomputed.
    pub fn set_offset(&mut self, param: OffsetParam, value: Option<f32>, recompute: bool) -> Option<f32> {
        let prev = match value {
            Some(v) => self.overrides.offsets.insert(param, v),
            None => self.overrides.offsets.remove(&param),
        };
        if recompute && self.auto_update {
            for &bone in param.affected_nodes() {
                self.compute_node_offset(bone);
            }
        }
        let effective = value.unwrap_or_else(|| param.default_value());
        self.notify(&param.key(), |o| o.on_offset_changed(param, effective));
        prev
    }

    /// [`Self::set_offset`] with recomputation.
    pub fn set_offset_auto(&mut self, param: OffsetParam, value: Option<f32>) -> Option<f32> {
        self.set_offset(param, value, true)
    }

    pub fn offset(&self, param: OffsetParam) -> f32 {
        self.overrides.offsets.get(&param).copied().unwrap_or_else(|| param.default_value())
    }

    // ---- toggles ---------------------------------------------------------

    pub fn set_toggle(&mut self, param: ToggleParam, value: Option<bool>) -> Option<bool> {
        let prev = match value {
            Some(v) => self.overrides.toggles.insert(param, v),
            None => self.overrides.toggles.remove(&param),
        };
        let effective = value.unwrap_or_else(|| param.default_value());
        self.notify(&param.key(), |o| o.on_toggle_changed(param, effective));
        prev
    }

    pub fn toggle(&self, param: ToggleParam) -> bool {
        self.overrides.toggles.get(&param).copied().unwrap_or_else(|| param.default_value())
    }

    // ---- values ----------------------------------------------------------

    pub fn set_value(&mut self, param: ValueParam, value: Option<f32>) -> Option<f32> {
        let prev = match value {
            Some(v) => self.overrides.values.insert(param, v),
            None => self.overrides.values.remove(&param),
        };
        let effective = value.unwrap_or_else(|| param.default_value());
        self.notify(&param.key(), |o| o.on_value_changed(param, effective));
        prev
    }

    pub fn value(&self, param: ValueParam) -> f32 {
        self.overrides.values.get(&param).copied().unwrap_or_else(|| param.default_value())
    }

    // ---- string keyed ----------------------------------------------------

    /// Unknown keys are ignored and return `None`.
    pub fn set_offset_by_key(&mut self, key: &str, value: Option<f32>) -> Option<f32> {
        match OffsetParam::from_key(key) {
            Some(p) => self.set_offset(p, value, true),
            None => unknown_key(key),
        }
    }

    /// Unknown keys read as `0.0`.
    pub fn offset_by_key(&self, key: &str) -> f32 {
        match OffsetParam::from_key(key) {
            Some(p) => self.offset(p),
            None => unknown_key(key).unwrap_or(0.0),
        }
    }

    pub fn set_toggle_by_key(&mut self, key: &str, value: Option<bool>) -> Option<bool> {
        match ToggleParam::from_key(key) {
            Some(p) => self.set_toggle(p, value),
            None => unknown_key(key),
        }
    }

    /// Unknown keys read as `false`.
    pub fn toggle_by_key(&self, key: &str) -> bool {
        match ToggleParam::from_key(key) {
            Some(p) => self.toggle(p),
            None => unknown_key(key).unwrap_or(false),
        }
    }

    pub fn set_value_by_key(&mut self, key: &str, value: Option<f32>) -> Option<f32> {
        match ValueParam::from_key(key) {
            Some(p) => self.set_value(p, value),
            None => unknown_key(key),
        }
    }

    /// Unknown keys read as `0.0`.
    pub fn value_by_key(&self, key: &str) -> f32 {
        match ValueParam::from_key(key) {
            Some(p) => self.value(p),
            None => unknown_key(key).unwrap_or(0.0),
        }
    }

    // ---- bulk ------------------------------------------------------------

    /// Apply many overrides, then recompute every node once.
    pub fn set_configs(&mut self, overrides: &Overrides) {
        for (&p, &v) in &overrides.offsets {
            self.set_offset(p, Some(v), false);
        }
        for (&p, &v) in &overrides.toggles {
            self.set_toggle(p, Some(v));
        }
        for (&p, &v) in &overrides.values {
            self.set_value(p, Some(v));
        }
        if self.auto_update {
            self.compute_all_node_offsets();
        }
    }

    /// [`Self::set_configs`] keyed by persistence key or display name. Unknown keys are skipped.
    pub fn set_string_configs<K, O, T, V>(&mut self, offsets: O, toggles: T, values: V)
    where
        K: AsRef<str>,
        O: IntoIterator<Item = (K, f32)>,
        T: IntoIterator<Item = (K, bool)>,
        V: IntoIterator<Item = (K, f32)>,
    {
        for (k, v) in offsets {
            match OffsetParam::from_key(k.as_ref()) {
                Some(p) => { self.set_offset(p, Some(v), false); }
                None => { unknown_key::<()>(k.as_ref()); }
            }
        }
        for (k, v) in toggles {
            match ToggleParam::from_key(k.as_ref()) {
                Some(p) => { self.set_toggle(p, Some(v)); }
                None => { unknown_key::<()>(k.as_ref()); }
            }
        }
        for (k, v) in values {
            match ValueParam::from_key(k.as_ref()) {
                Some(p) => { self.set_value(p, Some(v)); }
                None => { unknown_key::<()>(k.as_ref()); }
            }
        }
        if self.auto_update {
            self.compute_all_node_offsets();
        }
    }

    /// Take over every override of `other`.
    pub fn copy_from(&mut self, other: &SkeletonConfig) {
        let overrides = other.overrides.clone();
        self.set_configs(&overrides);
    }

    /// Drop all overrides and report every entry's default.
    pub fn reset_configs(&mut self) {
        self.overrides.clear();
        self.notify_all(false);
        if self.auto_update {
            self.compute_all_node_offsets();
        }
    }

    // ---- persistence -----------------------------------------------------

    /// Read every catalog key from `store`. Absent or wrong-typed entries keep their current value.
    pub fn load_from<S: KeyedStore + ?Sized>(&mut self, store: &S) {
        for p in OffsetParam::ALL {
            if let Some(v) = read_f32(store, p.key()) {
                self.set_offset(p, Some(v), false);
            }
        }
        for p in ToggleParam::ALL {
            if let Some(v) = read_bool(store, p.key()) {
                self.set_toggle(p, Some(v));
            }
        }
        for p in ValueParam::ALL {
            if let Some(v) = read_f32(store, p.key()) {
                self.set_value(p, Some(v));
            }
        }
        if self.auto_update {
            self.compute_all_node_offsets();
        }
    }

    /// Write the effective value of every catalog key, overridden or not.
    pub fn save_to<S: KeyedStore + ?Sized>(&self, store: &mut S) {
        for p in OffsetParam::ALL {
            store.set(p.key(), RawValue::F32(self.offset(p)));
        }
        for p in ToggleParam::ALL {
            store.set(p.key(), RawValue::Bool(self.toggle(p)));
        }
        for p in ValueParam::ALL {
            store.set(p.key(), RawValue::F32(self.value(p)));
        }
    }

    // ---- node offsets ----------------------------------------------------

    /// Last computed offset of `bone`; zero if it was never computed.
    pub fn node_offset(&self, bone: BoneNode) -> Vec3 { self.node_offsets.get(bone) }

    pub fn node_offsets(&self) -> NodeOffsets { self.node_offsets.clone() }

    pub fn compute_node_offset(&mut self, bone: BoneNode) {
        let offset = offsets::compute_node_offset(bone, |p| self.offset(p));
        self.node_offsets.set(bone, offset);
        self.notify(&bone, |o| o.on_node_offset_changed(bone, offset));
    }

    pub fn compute_all_node_offsets(&mut self) {
        self.node_offsets = offsets::compute_all(|p| self.offset(p));
        for (bone, offset) in self.node_offsets.iter() {
            self.notify(&bone, |o| o.on_node_offset_changed(bone, offset));
        }
    }

    // ---- notification ----------------------------------------------------

    fn notify<F>(&self, context: &dyn fmt::Display, call: F)
    where
        F: FnOnce(&dyn ConfigObserver) -> ObserverResult,
    {
        if let Some(observer) = self.observer.as_deref() {
            guarded(self.faults.as_ref(), context, || call(observer));
        }
    }

    /// Report every catalog entry. With `defaults_only`, overridden entries are skipped.
    fn notify_all(&self, defaults_only: bool) {
        if self.observer.is_none() {
            return;
        }
        for p in OffsetParam::ALL {
            if !defaults_only || !self.overrides.offsets.contains_key(&p) {
                let v = self.offset(p);
                self.notify(&p.key(), |o| o.on_offset_changed(p, v));
            }
        }
        for p in ToggleParam::ALL {
            if !defaults_only || !self.overrides.toggles.contains_key(&p) {
                let v = self.toggle(p);
                self.notify(&p.key(), |o| o.on_toggle_changed(p, v));
            }
        }
        for p in ValueParam::ALL {
            if !defaults_only || !self.overrides.values.contains_key(&p) {
                let v = self.value(p);
                self.notify(&p.key(), |o| o.on_value_changed(p, v));
            }
        }
    }
}

impl Default for SkeletonConfig {
    fn default() -> Self { Self::new(true) }
}

fn unknown_key<T>(key: &str) -> Option<T> {
    log::debug!("{}", ConfigError::UnknownConfigKey(key.to_string()));
    None
}

/// Builds a [`SkeletonConfig`], optionally seeded and observed.
///
/// On `build`, seeded overrides are applied first, then every remaining entry
/// is reported to the observer with its default, so each catalog entry is seen
/// exactly once. With auto-update, all node offsets are then computed.
pub struct SkeletonConfigBuilder {
    auto_update: bool,
    observer: Option<Box<dyn ConfigObserver>>,
    faults: Option<Box<dyn FaultSink>>,
    seed: Overrides,
}

impl Default for SkeletonConfigBuilder {
    fn default() -> Self { Self::new() }
}

impl SkeletonConfigBuilder {
    pub fn new() -> Self { Self { auto_update: true, observer: None, faults: None, seed: Overrides::default() } }
    pub fn auto_update(mut self, on: bool) -> Self { self.auto_update = on; self }
    pub fn observer(mut self, observer: impl ConfigObserver + 'static) -> Self { self.observer = Some(Box::new(observer)); self }
    pub fn boxed_observer(mut self, observer: Option<Box<dyn ConfigObserver>>) -> Self { self.observer = observer; self }
    pub fn fault_sink(mut self, sink: impl FaultSink + 'static) -> Self { self.faults = Some(Box::new(sink)); self }
    pub fn seed_with(mut self, overrides: Overrides) -> Self { self.seed = overrides; self }
    pub fn seed_from(mut self, other: &SkeletonConfig) -> Self { self.seed = other.overrides.clone(); self }

    pub fn build(self) -> SkeletonConfig {
        let mut cfg = SkeletonConfig {
            overrides: Overrides::default(),
            node_offsets: NodeOffsets::default(),
            auto_update: self.auto_update,
            observer: self.observer,
            faults: self.faults.unwrap_or_else(|| Box::new(LogFaultSink)),
        };
        for (&p, &v) in &self.seed.offsets {
            cfg.set_offset(p, Some(v), false);
        }
        for (&p, &v) in &self.seed.toggles {
            cfg.set_toggle(p, Some(v));
        }
        for (&p, &v) in &self.seed.values {
            cfg.set_value(p, Some(v));
        }
        cfg.notify_all(true);
        if cfg.auto_update {
            cfg.compute_all_node_offsets();
        }
        cfg
    }
}
