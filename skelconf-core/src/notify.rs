//! Change notification: the observer a store reports to, and where observer
//! failures are reported.

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use glam::Vec3;

use crate::catalog::{BoneNode, OffsetParam, ToggleParam, ValueParam};
use crate::error::ConfigError;

pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;
pub type ObserverResult = std::result::Result<(), ObserverError>;

/// Receives every effective-value change made by a [`crate::rig::SkeletonConfig`].
///
/// Values are always resolved: a removed override is reported as the catalog
/// default. Errors and panics are contained by the store and never undo the
/// mutation that triggered them.
pub trait ConfigObserver {
    fn on_offset_changed(&self, _param: OffsetParam, _value: f32) -> ObserverResult { Ok(()) }
    fn on_toggle_changed(&self, _param: ToggleParam, _value: bool) -> ObserverResult { Ok(()) }
    fn on_value_changed(&self, _param: ValueParam, _value: f32) -> ObserverResult { Ok(()) }
    fn on_node_offset_changed(&self, _bone: BoneNode, _offset: Vec3) -> ObserverResult { Ok(()) }
}

/// Destination for isolated faults raised while notifying observers.
pub trait FaultSink {
    fn report(&self, fault: ConfigError);
}

/// Forwards faults to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFaultSink;

impl FaultSink for LogFaultSink {
    fn report(&self, fault: ConfigError) { log::error!("[SkeletonConfig] {fault}"); }
}

/// Keeps faults in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CollectingFaultSink {
    faults: Rc<RefCell<Vec<String>>>,
}

impl CollectingFaultSink {
    pub fn new() -> Self { Self::default() }
    pub fn faults(&self) -> Vec<String> { self.faults.borrow().clone() }
    pub fn len(&self) -> usize { self.faults.borrow().len() }
    pub fn is_empty(&self) -> bool { self.faults.borrow().is_empty() }
}

impl FaultSink for CollectingFaultSink {
    fn report(&self, fault: ConfigError) { self.faults.borrow_mut().push(fault.to_string()); }
}

/// Run one observer callback, turning an error or a panic into a reported fault.
pub(crate) fn guarded<F>(sink: &dyn FaultSink, context: &dyn std::fmt::Display, call: F)
where
    F: FnOnce() -> ObserverResult,
{
    let message = match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => return,
        Ok(Err(e)) => e.to_string(),
        Err(panic) => panic_message(panic.as_ref()),
    };
    sink.report(ConfigError::ObserverFault { context: context.to_string(), message });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

/// One notification as seen by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEvent {
    Offset(OffsetParam, f32),
    Toggle(ToggleParam, bool),
    Value(ValueParam, f32),
    NodeOffset(BoneNode, Vec3),
}

impl std::fmt::Display for ConfigEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigEvent::Offset(p, v) => write!(f, "offset {} = {v}", p.key()),
            ConfigEvent::Toggle(p, v) => write!(f, "toggle {} = {v}", p.key()),
            ConfigEvent::Value(p, v) => write!(f, "value {} = {v}", p.key()),
            ConfigEvent::NodeOffset(b, o) => write!(f, "node {b} = ({:.3}, {:.3}, {:.3})", o.x, o.y, o.z),
        }
    }
}

/// Observer that appends every notification to a shared log.
///
/// Keep a clone before handing one to the store; both see the same events.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<ConfigEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<ConfigEvent> { self.events.borrow().clone() }

    /// Drain recorded events.
    pub fn take(&self) -> Vec<ConfigEvent> { std::mem::take(&mut *self.events.borrow_mut()) }

    pub fn clear(&self) { self.events.borrow_mut().clear(); }

    /// Events about parameters, skipping node offset updates.
    pub fn param_events(&self) -> Vec<ConfigEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| !matches!(e, ConfigEvent::NodeOffset(..)))
            .cloned()
            .collect()
    }

    fn push(&self, e: ConfigEvent) -> ObserverResult {
        self.events.borrow_mut().push(e);
        Ok(())
    }
}

impl ConfigObserver for RecordingObserver {
    fn on_offset_changed(&self, param: OffsetParam, value: f32) -> ObserverResult {
        self.push(ConfigEvent::Offset(param, value))
    }
    fn on_toggle_changed(&self, param: ToggleParam, value: bool) -> ObserverResult {
        self.push(ConfigEvent::Toggle(param, value))
    }
    fn on_value_changed(&self, param: ValueParam, value: f32) -> ObserverResult {
        self.push(ConfigEvent::Value(param, value))
    }
    fn on_node_offset_changed(&self, bone: BoneNode, offset: Vec3) -> ObserverResult {
        self.push(ConfigEvent::NodeOffset(bone, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_reports_errors_and_panics() {
        let sink = CollectingFaultSink::new();
        guarded(&sink, &"ok", || Ok(()));
        guarded(&sink, &"err", || Err("boom".into()));
        guarded(&sink, &"panic", || panic!("kaboom"));
        let faults = sink.faults();
        assert_eq!(faults.len(), 2);
        assert!(faults[0].contains("err") && faults[0].contains("boom"));
        assert!(faults[1].contains("panicked: kaboom"));
    }

    #[test]
    fn recorder_clones_share_events() {
        let rec = RecordingObserver::new();
        let handle = rec.clone();
        rec.on_toggle_changed(ToggleParam::FloorClip, true).unwrap();
        rec.on_node_offset_changed(BoneNode::Head, Vec3::Z).unwrap();
        assert_eq!(handle.events().len(), 2);
        assert_eq!(handle.param_events(), vec![ConfigEvent::Toggle(ToggleParam::FloorClip, true)]);
        assert_eq!(handle.take().len(), 2);
        assert!(rec.events().is_empty());
    }
}
