//! Shader uniform animation
//!
//! Bindings are registered once while a scene is assembled. Each tick every
//! binding re-evaluates its rule from elapsed time and its own external
//! parameter. A rule never sees any other binding, which keeps bindings
//! independent of one another and of evaluation order.

pub mod packing;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::assets::MaterialHandle;
use crate::foundation::color::Color;
use crate::foundation::math::utils;

/// Uniform payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Scalar float
    Float(f32),
    /// RGB color
    Color(Color),
}

impl UniformValue {
    /// Scalar payload, if this is a float
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Color(_) => None,
        }
    }

    /// Color payload, if this is a color
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Float(_) => None,
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Color(_) => "color",
        }
    }
}

/// Identifies a uniform: its name is unique within one material
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniformKey {
    /// Material that owns the uniform
    pub material: MaterialHandle,
    /// Uniform name as declared in the shader
    pub name: String,
}

impl UniformKey {
    /// Create a key
    pub fn new(material: MaterialHandle, name: impl Into<String>) -> Self {
        Self {
            material,
            name: name.into(),
        }
    }
}

impl fmt::Display for UniformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.material.0)
    }
}

/// Accepted range for a float uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformDomain {
    /// Lower bound (inclusive)
    pub min: f32,
    /// Upper bound (inclusive)
    pub max: f32,
}

impl UniformDomain {
    /// Create a domain
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// How a binding computes its value each tick
#[derive(Clone)]
pub enum UniformRule {
    /// Value is the external parameter as-is
    Static,
    /// `scale * t + offset`
    Linear {
        /// Rate per second
        scale: f32,
        /// Value at t = 0
        offset: f32,
    },
    /// `bias + amplitude * sin(frequency * t + phase)`
    Oscillate {
        /// Peak deviation from `bias`
        amplitude: f32,
        /// Angular frequency in radians per second
        frequency: f32,
        /// Phase offset in radians
        phase: f32,
        /// Center value
        bias: f32,
    },
    /// Pure function of elapsed time and the binding's own parameter
    ///
    /// A plain `fn` captures nothing, so a custom rule can never read
    /// another binding or its own handle.
    Custom(fn(f32, &UniformValue) -> UniformValue),
}

impl UniformRule {
    /// Rule that feeds elapsed seconds straight through, e.g. `uTime`
    pub fn elapsed() -> Self {
        Self::Linear { scale: 1.0, offset: 0.0 }
    }

    /// Wrap a non-capturing function as a custom rule
    pub fn custom(rule: fn(f32, &UniformValue) -> UniformValue) -> Self {
        Self::Custom(rule)
    }

    /// Evaluate the rule at `elapsed` seconds
    pub fn evaluate(&self, elapsed: f32, parameter: &UniformValue) -> UniformValue {
        match self {
            Self::Static => *parameter,
            Self::Linear { scale, offset } => UniformValue::Float(scale * elapsed + offset),
            Self::Oscillate { amplitude, frequency, phase, bias } => {
                UniformValue::Float(bias + amplitude * (frequency * elapsed + phase).sin())
            }
            Self::Custom(rule) => rule(elapsed, parameter),
        }
    }
}

impl fmt::Debug for UniformRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("Static"),
            Self::Linear { scale, offset } => f
                .debug_struct("Linear")
                .field("scale", scale)
                .field("offset", offset)
                .finish(),
            Self::Oscillate { amplitude, frequency, phase, bias } => f
                .debug_struct("Oscillate")
                .field("amplitude", amplitude)
                .field("frequency", frequency)
                .field("phase", phase)
                .field("bias", bias)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Uniform registration and update errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UniformError {
    /// A binding with this key already exists
    #[error("Uniform already registered: {0}")]
    DuplicateBinding(UniformKey),

    /// No binding with this key exists
    #[error("Unknown uniform: {0}")]
    UnknownBinding(UniformKey),

    /// Value kind does not match the binding's kind
    #[error("Uniform {key} expects a {expected} value, got {found}")]
    KindMismatch {
        /// The binding that rejected the value
        key: UniformKey,
        /// Kind fixed at registration
        expected: &'static str,
        /// Kind that was offered
        found: &'static str,
    },
}

/// One named uniform, its current value and its update rule
#[derive(Debug, Clone)]
pub struct UniformBinding {
    key: UniformKey,
    value: UniformValue,
    parameter: UniformValue,
    rule: UniformRule,
    domain: Option<UniformDomain>,
    last_elapsed: f32,
}

impl UniformBinding {
    /// Binding whose initial value and parameter are `initial`, with a static rule
    pub fn new(key: UniformKey, initial: UniformValue) -> Self {
        Self {
            key,
            value: initial,
            parameter: initial,
            rule: UniformRule::Static,
            domain: None,
            last_elapsed: 0.0,
        }
    }

    /// Set the update rule
    pub fn with_rule(mut self, rule: UniformRule) -> Self {
        self.rule = rule;
        self
    }

    /// Restrict float values to a domain
    pub fn with_domain(mut self, domain: UniformDomain) -> Self {
        self.domain = Some(domain);
        self.value = self.sanitize(self.value);
        self
    }

    /// Key of this binding
    pub fn key(&self) -> &UniformKey {
        &self.key
    }

    /// Current value
    pub fn value(&self) -> UniformValue {
        self.value
    }

    fn evaluate(&mut self, elapsed: f32) {
        self.last_elapsed = elapsed;
        let next = self.rule.evaluate(elapsed, &self.parameter);
        if !next.same_kind(&self.value) {
            log::warn!(
                "Uniform {} rule produced a {} value, keeping {}",
                self.key,
                next.kind_name(),
                self.value.kind_name()
            );
            return;
        }
        self.value = self.sanitize(next);
    }

    /// Clamp a value into the binding's accepted domain
    fn sanitize(&self, value: UniformValue) -> UniformValue {
        match value {
            UniformValue::Float(raw) => {
                let clamped = match self.domain {
                    Some(domain) => utils::clamp(raw, domain.min, domain.max),
                    None if raw.is_finite() => raw,
                    None => self.value.as_float().filter(|v| v.is_finite()).unwrap_or(0.0),
                };
                if clamped != raw {
                    log::debug!("Uniform {} clamped {} -> {}", self.key, raw, clamped);
                }
                UniformValue::Float(clamped)
            }
            UniformValue::Color(color) => {
                if !color.is_in_range() {
                    log::debug!("Uniform {} color {:?} clamped", self.key, color);
                }
                UniformValue::Color(color.clamped())
            }
        }
    }

    fn check_kind(&self, value: &UniformValue) -> Result<(), UniformError> {
        if value.same_kind(&self.value) {
            Ok(())
        } else {
            Err(UniformError::KindMismatch {
                key: self.key.clone(),
                expected: self.value.kind_name(),
                found: value.kind_name(),
            })
        }
    }
}

/// Shared handle to a registered binding
///
/// Control-panel callbacks hold clones of this handle and write through it
/// synchronously; the animator sees the change on its next tick.
#[derive(Debug, Clone)]
pub struct UniformHandle(Rc<RefCell<UniformBinding>>);

impl UniformHandle {
    /// Key of the binding
    pub fn key(&self) -> UniformKey {
        self.0.borrow().key.clone()
    }

    /// Current value
    pub fn value(&self) -> UniformValue {
        self.0.borrow().value
    }

    /// Pin the binding to `value`, replacing its rule with [`UniformRule::Static`]
    ///
    /// Takes effect immediately; later ticks keep reporting `value`.
    pub fn override_value(&self, value: UniformValue) -> Result<(), UniformError> {
        let mut binding = self.0.borrow_mut();
        binding.check_kind(&value)?;
        binding.rule = UniformRule::Static;
        binding.parameter = value;
        binding.value = binding.sanitize(value);
        log::debug!("Uniform {} overridden to {:?}", binding.key, binding.value);
        Ok(())
    }

    /// Change the external parameter while keeping the rule
    ///
    /// The value is recomputed right away at the last seen elapsed time.
    pub fn set_parameter(&self, parameter: UniformValue) -> Result<(), UniformError> {
        let mut binding = self.0.borrow_mut();
        binding.check_kind(&parameter)?;
        binding.parameter = parameter;
        let elapsed = binding.last_elapsed;
        binding.evaluate(elapsed);
        Ok(())
    }

    /// Replace the rule; last write wins
    pub fn replace_rule(&self, rule: UniformRule) {
        let mut binding = self.0.borrow_mut();
        binding.rule = rule;
        let elapsed = binding.last_elapsed;
        binding.evaluate(elapsed);
    }
}

/// Owns every uniform binding of a scene and advances them each tick
#[derive(Debug, Default)]
pub struct UniformAnimator {
    bindings: Vec<UniformHandle>,
    index: HashMap<UniformKey, usize>,
}

impl UniformAnimator {
    /// Create an animator with no bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding; keys must be unique
    pub fn register(&mut self, binding: UniformBinding) -> Result<UniformHandle, UniformError> {
        if self.index.contains_key(&binding.key) {
            return Err(UniformError::DuplicateBinding(binding.key));
        }
        log::debug!("Registered uniform {} with rule {:?}", binding.key, binding.rule);
        let key = binding.key.clone();
        let handle = UniformHandle(Rc::new(RefCell::new(binding)));
        self.index.insert(key, self.bindings.len());
        self.bindings.push(handle.clone());
        Ok(handle)
    }

    /// Handle to a registered binding
    pub fn get(&self, key: &UniformKey) -> Result<UniformHandle, UniformError> {
        self.index
            .get(key)
            .map(|&slot| self.bindings[slot].clone())
            .ok_or_else(|| UniformError::UnknownBinding(key.clone()))
    }

    /// Current value of a uniform
    pub fn value(&self, material: MaterialHandle, name: &str) -> Option<UniformValue> {
        self.get(&UniformKey::new(material, name)).ok().map(|handle| handle.value())
    }

    /// Re-evaluate every binding at `elapsed` seconds
    pub fn tick(&mut self, elapsed: f32) {
        for handle in &self.bindings {
            handle.0.borrow_mut().evaluate(elapsed);
        }
    }

    /// Uniforms of one material in registration order
    pub fn values_for(&self, material: MaterialHandle) -> Vec<(String, UniformValue)> {
        self.bindings
            .iter()
            .map(|handle| handle.0.borrow())
            .filter(|binding| binding.key.material == material)
            .map(|binding| (binding.key.name.clone(), binding.value))
            .collect()
    }

    /// Every uniform in registration order
    pub fn snapshot(&self) -> Vec<(UniformKey, UniformValue)> {
        self.bindings
            .iter()
            .map(|handle| {
                let binding = handle.0.borrow();
                (binding.key.clone(), binding.value)
            })
            .collect()
    }

    /// Pack one material's uniforms into a std140 byte block
    pub fn pack_material(&self, material: MaterialHandle) -> Vec<u8> {
        let values: Vec<UniformValue> = self.values_for(material).into_iter().map(|(_, value)| value).collect();
        packing::pack_std140(&values)
    }

    /// Get number of registered bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no bindings are registered
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
