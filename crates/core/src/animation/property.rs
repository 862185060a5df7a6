//! Tweening arbitrary gettable/settable properties between named
//! states, integrated with the timeline as pollable actions.

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::animation::AnimationError;
use crate::ease::Easing;
use crate::timeline::{TimelineAction, TimelineCtx};

/// Something with a readable and writable value of type `T`.
pub trait Property<T> {
    fn get(&self) -> T;
    fn set(&mut self, value: T);
}

struct FnProperty<T> {
    getter: Box<dyn Fn() -> T>,
    setter: Box<dyn FnMut(T)>,
}

impl<T> Property<T> for FnProperty<T> {
    fn get(&self) -> T {
        (self.getter)()
    }

    fn set(&mut self, value: T) {
        (self.setter)(value)
    }
}

/// Shared handle to a property so the animation and its tweens can
/// both reach it.
pub struct SharedProperty<T> {
    inner: Rc<RefCell<dyn Property<T>>>,
}

impl<T> Clone for SharedProperty<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T: 'static> SharedProperty<T> {
    pub fn new(property: impl Property<T> + 'static) -> Self {
        Self { inner: Rc::new(RefCell::new(property)) }
    }

    pub fn from_fns(getter: impl Fn() -> T + 'static, setter: impl FnMut(T) + 'static) -> Self {
        Self::new(FnProperty { getter: Box::new(getter), setter: Box::new(setter) })
    }

    pub fn get(&self) -> T {
        self.inner.borrow().get()
    }

    pub fn set(&self, value: T) {
        self.inner.borrow_mut().set(value)
    }
}

/// Interpolation function for values of type `T`.
pub struct Interpolator<T> {
    function: Rc<dyn Fn(&T, &T, f32) -> T>,
}

impl<T> Clone for Interpolator<T> {
    fn clone(&self) -> Self {
        Self { function: Rc::clone(&self.function) }
    }
}

impl<T> Interpolator<T> {
    pub fn new(function: impl Fn(&T, &T, f32) -> T + 'static) -> Self {
        Self { function: Rc::new(function) }
    }

    pub fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        (self.function)(start, end, t)
    }
}

/// Interpolators keyed by value type; linear f32 lerp ships by
/// default.
pub struct InterpolatorRegistry {
    entries: HashMap<TypeId, Box<dyn Any>>,
}

impl Default for InterpolatorRegistry {
    fn default() -> Self {
        let mut registry = Self { entries: HashMap::new() };
        registry.register::<f32>(|start, end, t| start + (end - start) * t);
        registry
    }
}

impl InterpolatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: 'static>(&mut self, function: impl Fn(&T, &T, f32) -> T + 'static) {
        self.entries.insert(TypeId::of::<T>(), Box::new(Interpolator::new(function)));
    }

    pub fn resolve<T: 'static>(&self) -> Option<Interpolator<T>> {
        self.entries.get(&TypeId::of::<T>())?.downcast_ref::<Interpolator<T>>().cloned()
    }
}

/// A named target value with its transition timing.
#[derive(Clone, Debug)]
pub struct AnimState<T> {
    pub name: String,
    pub value: T,
    pub duration: Duration,
    pub easing: Easing,
}

/// Animates a property between named states.
pub struct PropertyAnimation<T> {
    property: SharedProperty<T>,
    states: Vec<AnimState<T>>,
    interpolator: Interpolator<T>,
}

impl<T: Clone + 'static> PropertyAnimation<T> {
    /// Resolves the interpolator from the registry; failing to find
    /// one is a fatal setup error.
    pub fn new(
        property: SharedProperty<T>,
        states: Vec<AnimState<T>>,
        registry: &InterpolatorRegistry,
    ) -> Result<Self, AnimationError> {
        let interpolator = registry
            .resolve::<T>()
            .ok_or(AnimationError::NoInterpolator { type_name: type_name::<T>() })?;
        Ok(Self { property, states, interpolator })
    }

    /// Bypasses the registry with an explicit interpolator.
    pub fn with_interpolator(
        property: SharedProperty<T>,
        states: Vec<AnimState<T>>,
        interpolator: Interpolator<T>,
    ) -> Self {
        Self { property, states, interpolator }
    }

    /// A timeline action tweening the property from its current value
    /// to the named state.
    pub fn to_state(&self, name: &str) -> Result<Box<dyn TimelineAction>, AnimationError> {
        let state = self
            .states
            .iter()
            .find(|state| state.name == name)
            .ok_or_else(|| AnimationError::UnknownState(name.to_string()))?;
        Ok(Box::new(PropertyTween {
            property: self.property.clone(),
            target: state.value.clone(),
            duration: state.duration,
            easing: state.easing,
            interpolator: self.interpolator.clone(),
            from: None,
            started_at: None,
        }))
    }
}

/// Timeline action interpolating a property toward a target value.
struct PropertyTween<T> {
    property: SharedProperty<T>,
    target: T,
    duration: Duration,
    easing: Easing,
    interpolator: Interpolator<T>,
    from: Option<T>,
    started_at: Option<Instant>,
}

impl<T: Clone + 'static> PropertyTween<T> {
    fn progress(&self) -> f32 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        (started_at.elapsed().as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

impl<T: Clone + 'static> TimelineAction for PropertyTween<T> {
    fn start(&mut self, _ctx: &mut TimelineCtx) {
        self.from = Some(self.property.get());
        self.started_at = Some(Instant::now());
    }

    fn update(&mut self, _ctx: &mut TimelineCtx) {
        let Some(from) = &self.from else {
            return;
        };
        let eased = self.easing.apply(self.progress());
        self.property.set(self.interpolator.interpolate(from, &self.target, eased));
    }

    fn is_finished(&mut self, _ctx: &mut TimelineCtx) -> bool {
        self.progress() >= 1.0
    }

    fn end(&mut self, _ctx: &mut TimelineCtx) {
        // Interpolation may undershoot on the last frame; the state's
        // exact value always wins.
        self.property.set(self.target.clone());
    }
}
