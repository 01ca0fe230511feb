//! In-process control panel
//!
//! Holds the registered controls, their current values and the callbacks
//! subscribed to them. Changes are dispatched immediately: by the time
//! [`LocalControlPanel::set`] returns every subscriber has run.

use std::collections::HashMap;
use std::fmt;

use super::{ControlCallback, ControlError, ControlPanel, ControlSpec, ControlValue};

type ControlId = (String, String);

struct ControlEntry {
    spec: ControlSpec,
    value: ControlValue,
    handlers: Vec<ControlCallback>,
}

/// Control panel driven programmatically or by a host UI
#[derive(Default)]
pub struct LocalControlPanel {
    controls: HashMap<ControlId, ControlEntry>,
    order: Vec<ControlId>,
}

impl LocalControlPanel {
    /// Create an empty panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Change a control's value and notify its subscribers
    ///
    /// Floats are clamped and snapped to the control's range first. Returns
    /// the value that was actually applied.
    pub fn set(&mut self, target: &str, key: &str, value: ControlValue) -> Result<ControlValue, ControlError> {
        let entry = self
            .controls
            .get_mut(&(target.to_owned(), key.to_owned()))
            .ok_or_else(|| ControlError::UnknownControl {
                target: target.to_owned(),
                key: key.to_owned(),
            })?;

        if !entry.value.same_kind(&value) {
            log::warn!("Control {} rejected a {} value", entry.spec, value.kind_name());
            return Err(ControlError::TypeMismatch {
                target: target.to_owned(),
                key: key.to_owned(),
                expected: entry.value.kind_name(),
                found: value.kind_name(),
            });
        }

        let applied = entry.spec.normalize(value);
        entry.value = applied;
        log::debug!("Control {} = {:?}", entry.spec, applied);

        for handler in &mut entry.handlers {
            handler(applied);
        }
        Ok(applied)
    }

    /// Current value of a control
    pub fn value(&self, target: &str, key: &str) -> Option<ControlValue> {
        self.controls
            .get(&(target.to_owned(), key.to_owned()))
            .map(|entry| entry.value)
    }

    /// Registered controls in registration order
    pub fn controls(&self) -> impl Iterator<Item = &ControlSpec> {
        self.order
            .iter()
            .filter_map(|id| self.controls.get(id).map(|entry| &entry.spec))
    }

    /// Get number of registered controls
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no controls are registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ControlPanel for LocalControlPanel {
    fn on_change(&mut self, spec: ControlSpec, callback: ControlCallback) -> Result<(), ControlError> {
        let id = (spec.target.clone(), spec.key.clone());

        if let Some(entry) = self.controls.get_mut(&id) {
            if !entry.value.same_kind(&spec.initial) {
                return Err(ControlError::TypeMismatch {
                    target: spec.target,
                    key: spec.key,
                    expected: entry.value.kind_name(),
                    found: spec.initial.kind_name(),
                });
            }
            // Omitted range or label defers to the first registration
            let conflict = if spec.range.is_some() && spec.range != entry.spec.range {
                Some("range")
            } else if spec.label.is_some() && spec.label != entry.spec.label {
                Some("label")
            } else {
                None
            };
            if let Some(field) = conflict {
                log::warn!("Control {} re-registered with a different {}", entry.spec, field);
                return Err(ControlError::ConflictingSpec {
                    target: spec.target,
                    key: spec.key,
                    field,
                });
            }
            entry.handlers.push(callback);
            return Ok(());
        }

        log::info!("Registered control '{}' ({})", spec.display_label(), spec);
        let value = spec.normalize(spec.initial);
        self.controls.insert(
            id.clone(),
            ControlEntry {
                spec,
                value,
                handlers: vec![callback],
            },
        );
        self.order.push(id);
        Ok(())
    }
}

impl fmt::Debug for LocalControlPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalControlPanel")
            .field("controls", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> ControlCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |tag: &'static str| -> ControlCallback {
            let sink = sink.clone();
            Box::new(move |value| sink.borrow_mut().push(format!("{}:{:?}", tag, value)))
        };
        (log, make)
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let (log, make) = recorder();
        let mut panel = LocalControlPanel::new();
        panel.on_change(ControlSpec::float("fireflies", "uSize", 100.0).with_step(0.0, 500.0, 1.0), make("first")).unwrap();
        panel.on_change(ControlSpec::float("fireflies", "uSize", 100.0), make("second")).unwrap();

        let applied = panel.set("fireflies", "uSize", ControlValue::Float(20.4)).unwrap();

        assert_eq!(applied, ControlValue::Float(20.0));
        assert_eq!(*log.borrow(), ["first:Float(20.0)", "second:Float(20.0)"]);
        assert_eq!(panel.len(), 1);
    }

    #[test]
    fn test_value_store() {
        let (_, make) = recorder();
        let mut panel = LocalControlPanel::new();
        panel.on_change(ControlSpec::float("light", "intensity", 7.0).with_range(0.0, 5.0), make("x")).unwrap();

        // Initial value is normalized on registration
        assert_eq!(panel.value("light", "intensity"), Some(ControlValue::Float(5.0)));

        panel.set("light", "intensity", ControlValue::Float(0.5)).unwrap();
        assert_eq!(panel.value("light", "intensity"), Some(ControlValue::Float(0.5)));
        assert_eq!(panel.value("light", "missing"), None);
    }

    #[test]
    fn test_unknown_control() {
        let mut panel = LocalControlPanel::new();
        let err = panel.set("portal", "uColorStart", ControlValue::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ControlError::UnknownControl {
                target: "portal".into(),
                key: "uColorStart".into()
            }
        );
    }

    #[test]
    fn test_type_mismatch_leaves_value() {
        let (log, make) = recorder();
        let mut panel = LocalControlPanel::new();
        panel.on_change(ControlSpec::toggle("light", "visible", true), make("v")).unwrap();

        let err = panel.set("light", "visible", ControlValue::Float(1.0)).unwrap_err();

        assert!(matches!(err, ControlError::TypeMismatch { expected: "bool", found: "float", .. }));
        assert_eq!(panel.value("light", "visible"), Some(ControlValue::Bool(true)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_resubscribe_with_other_kind_rejected() {
        let (_, make) = recorder();
        let mut panel = LocalControlPanel::new();
        panel.on_change(ControlSpec::toggle("light", "visible", true), make("a")).unwrap();

        let err = panel.on_change(ControlSpec::float("light", "visible", 1.0), make("b"));
        assert!(err.is_err());
    }

    #[test]
    fn test_resubscribe_with_other_range_or_label_rejected() {
        let (log, make) = recorder();
        let mut panel = LocalControlPanel::new();
        let spec = ControlSpec::float("fireflies", "uSize", 10.0)
            .with_step(0.0, 50.0, 1.0)
            .with_label("firefliesSize");
        panel.on_change(spec.clone(), make("first")).unwrap();

        let err = panel
            .on_change(spec.clone().with_range(0.0, 500.0), make("wide"))
            .unwrap_err();
        assert_eq!(
            err,
            ControlError::ConflictingSpec {
                target: "fireflies".into(),
                key: "uSize".into(),
                field: "range"
            }
        );
        let err = panel.on_change(spec.clone().with_label("size"), make("renamed")).unwrap_err();
        assert!(matches!(err, ControlError::ConflictingSpec { field: "label", .. }));

        // Same declaration subscribes fine; the rejected ones never dispatch
        panel.on_change(spec, make("same")).unwrap();
        panel.set("fireflies", "uSize", ControlValue::Float(80.0)).unwrap();
        assert_eq!(*log.borrow(), ["first:Float(50.0)", "same:Float(50.0)"]);
        assert_eq!(panel.controls().next().map(ControlSpec::display_label), Some("firefliesSize"));
    }

    #[test]
    fn test_controls_listed_in_order() {
        let (_, make) = recorder();
        let mut panel = LocalControlPanel::new();
        panel.on_change(ControlSpec::float("b", "x", 0.0), make("1")).unwrap();
        panel.on_change(ControlSpec::float("a", "y", 0.0), make("2")).unwrap();

        let listed: Vec<_> = panel.controls().map(ToString::to_string).collect();
        assert_eq!(listed, ["b.x", "a.y"]);
    }
}
