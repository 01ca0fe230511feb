//! Live tuning controls
//!
//! A control panel exposes named, typed, range-limited values. Subscribers
//! register a callback per control and are called synchronously, in
//! registration order, whenever the value changes. [`ControlBinding`]
//! wires controls to uniforms or to plain shared state such as a light
//! intensity or the clear color.

pub mod panel;

pub use panel::LocalControlPanel;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::foundation::color::Color;
use crate::uniforms::{UniformHandle, UniformValue};

/// Single-threaded shared cell written by control callbacks
pub type Shared<T> = Rc<Cell<T>>;

/// Wrap a value in a [`Shared`] cell
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(Cell::new(value))
}

/// Value carried by a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    /// Slider or number field
    Float(f32),
    /// Color picker
    Color(Color),
    /// Checkbox
    Bool(bool),
}

impl ControlValue {
    /// Name of the value kind, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Color(_) => "color",
            Self::Bool(_) => "bool",
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Accepted range of a float control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRange {
    /// Lower bound (inclusive)
    pub min: f32,
    /// Upper bound (inclusive)
    pub max: f32,
    /// Snap increment measured from `min`
    pub step: Option<f32>,
}

impl ControlRange {
    /// Range without snapping
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max, step: None }
    }

    /// Range snapping to multiples of `step` above `min`
    pub fn stepped(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step: Some(step) }
    }

    /// Clamp and snap a value into the range
    pub fn apply(&self, value: f32) -> f32 {
        use crate::foundation::math::utils::clamp;

        let clamped = clamp(value, self.min, self.max);
        match self.step {
            Some(step) if step > 0.0 => {
                let snapped = self.min + ((clamped - self.min) / step).round() * step;
                clamp(snapped, self.min, self.max)
            }
            _ => clamped,
        }
    }
}

/// Declaration of one control
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSpec {
    /// What the control acts on, e.g. a material or light name
    pub target: String,
    /// Property name on the target, e.g. `uSize`
    pub key: String,
    /// Display label; the key is shown when unset
    pub label: Option<String>,
    /// Range for float controls
    pub range: Option<ControlRange>,
    /// Starting value, which also fixes the control's kind
    pub initial: ControlValue,
}

impl ControlSpec {
    /// Float control
    pub fn float(target: impl Into<String>, key: impl Into<String>, initial: f32) -> Self {
        Self::new(target, key, ControlValue::Float(initial))
    }

    /// Color control
    pub fn color(target: impl Into<String>, key: impl Into<String>, initial: Color) -> Self {
        Self::new(target, key, ControlValue::Color(initial))
    }

    /// Checkbox control
    pub fn toggle(target: impl Into<String>, key: impl Into<String>, initial: bool) -> Self {
        Self::new(target, key, ControlValue::Bool(initial))
    }

    fn new(target: impl Into<String>, key: impl Into<String>, initial: ControlValue) -> Self {
        Self {
            target: target.into(),
            key: key.into(),
            label: None,
            range: None,
            initial,
        }
    }

    /// Limit a float control to `[min, max]`
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range = Some(ControlRange::new(min, max));
        self
    }

    /// Limit a float control to `[min, max]` in increments of `step`
    pub fn with_step(mut self, min: f32, max: f32, step: f32) -> Self {
        self.range = Some(ControlRange::stepped(min, max, step));
        self
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label shown to the user
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Bring a value into this control's accepted range
    pub fn normalize(&self, value: ControlValue) -> ControlValue {
        match value {
            ControlValue::Float(raw) => match self.range {
                Some(range) => ControlValue::Float(range.apply(raw)),
                None if raw.is_finite() => value,
                None => self.initial,
            },
            ControlValue::Color(color) => ControlValue::Color(color.clamped()),
            ControlValue::Bool(_) => value,
        }
    }
}

impl fmt::Display for ControlSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.key)
    }
}

/// Callback invoked with the new value of a control
pub type ControlCallback = Box<dyn FnMut(ControlValue)>;

/// Control panel errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// No control registered under this target and key
    #[error("Unknown control: {target}.{key}")]
    UnknownControl {
        /// Control target
        target: String,
        /// Control key
        key: String,
    },

    /// Value kind differs from the control's kind
    #[error("Control {target}.{key} expects a {expected} value, got {found}")]
    TypeMismatch {
        /// Control target
        target: String,
        /// Control key
        key: String,
        /// Kind fixed at registration
        expected: &'static str,
        /// Kind that was offered
        found: &'static str,
    },

    /// A second subscription declared a different range or label
    #[error("Control {target}.{key} is already registered with a different {field}")]
    ConflictingSpec {
        /// Control target
        target: String,
        /// Control key
        key: String,
        /// `range` or `label`
        field: &'static str,
    },
}

/// Subscription capability of a control panel
pub trait ControlPanel {
    /// Subscribe `callback` to changes of the control described by `spec`
    ///
    /// The control is created on first subscription. Further subscriptions
    /// to the same control must agree on its kind.
    fn on_change(&mut self, spec: ControlSpec, callback: ControlCallback) -> Result<(), ControlError>;
}

/// Adapters that turn control changes into writes
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlBinding;

impl ControlBinding {
    /// Override a uniform's value; the control wins over the uniform's rule
    pub fn uniform(panel: &mut dyn ControlPanel, spec: ControlSpec, handle: UniformHandle) -> Result<(), ControlError> {
        log::debug!("Binding control {} to uniform {}", spec, handle.key());
        panel.on_change(
            spec,
            Box::new(move |value| {
                if let Err(err) = handle.override_value(to_uniform(value)) {
                    log::warn!("Control change dropped: {}", err);
                }
            }),
        )
    }

    /// Feed a uniform's external parameter while its rule keeps running
    pub fn uniform_parameter(
        panel: &mut dyn ControlPanel,
        spec: ControlSpec,
        handle: UniformHandle,
    ) -> Result<(), ControlError> {
        log::debug!("Binding control {} to parameter of {}", spec, handle.key());
        panel.on_change(
            spec,
            Box::new(move |value| {
                if let Err(err) = handle.set_parameter(to_uniform(value)) {
                    log::warn!("Control change dropped: {}", err);
                }
            }),
        )
    }

    /// Forward a float control into shared state
    pub fn float(panel: &mut dyn ControlPanel, spec: ControlSpec, target: Shared<f32>) -> Result<(), ControlError> {
        let label = spec.to_string();
        panel.on_change(
            spec,
            Box::new(move |value| match value {
                ControlValue::Float(v) => target.set(v),
                other => log::warn!("Control {} ignored {} value", label, other.kind_name()),
            }),
        )
    }

    /// Forward a color control into shared state
    pub fn color(panel: &mut dyn ControlPanel, spec: ControlSpec, target: Shared<Color>) -> Result<(), ControlError> {
        let label = spec.to_string();
        panel.on_change(
            spec,
            Box::new(move |value| match value {
                ControlValue::Color(c) => target.set(c),
                other => log::warn!("Control {} ignored {} value", label, other.kind_name()),
            }),
        )
    }

    /// Forward a checkbox into shared state
    pub fn toggle(panel: &mut dyn ControlPanel, spec: ControlSpec, target: Shared<bool>) -> Result<(), ControlError> {
        let label = spec.to_string();
        panel.on_change(
            spec,
            Box::new(move |value| match value {
                ControlValue::Bool(b) => target.set(b),
                other => log::warn!("Control {} ignored {} value", label, other.kind_name()),
            }),
        )
    }
}

fn to_uniform(value: ControlValue) -> UniformValue {
    match value {
        ControlValue::Float(v) => UniformValue::Float(v),
        ControlValue::Color(c) => UniformValue::Color(c),
        ControlValue::Bool(b) => UniformValue::Float(if b { 1.0 } else { 0.0 }),
    }
}
