//! Time-scheduled interpolation on a host-supplied millisecond clock.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

use crate::camera::Camera;
use crate::model::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
    CubicOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
            Self::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
        }
    }
}

pub trait Interpolate: Copy {
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Point::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

impl Interpolate for Camera {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Camera::new(
            lerp(self.translate_x, to.translate_x, t),
            lerp(self.translate_y, to.translate_y, t),
            lerp(self.scale, to.scale, t),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl<T: Interpolate> Transition<T> {
    pub fn new(from: T, to: T, start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now_ms: f64) -> T {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        self.from.interpolate(&self.to, self.easing.apply(t))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

/// Keyed transitions where starting a new one supersedes the old.
#[derive(Debug, Clone)]
pub struct Animator<K, T> {
    transitions: IndexMap<K, Transition<T>>,
}

impl<K, T> Default for Animator<K, T> {
    fn default() -> Self {
        Self {
            transitions: IndexMap::new(),
        }
    }
}

impl<K, T> Animator<K, T>
where
    K: Hash + Eq + std::fmt::Debug,
    T: Interpolate,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts animating `key` towards `to`. If a transition for `key` is still running, the
    /// new one starts from its current value instead of `from`.
    pub fn start(
        &mut self,
        key: K,
        from: T,
        to: T,
        now_ms: f64,
        duration_ms: f64,
        easing: Easing,
    ) -> &Transition<T> {
        let from = match self.transitions.get(&key) {
            Some(running) if !running.is_finished(now_ms) => {
                tracing::trace!(?key, "superseding in-flight transition");
                running.value_at(now_ms)
            }
            _ => from,
        };
        let transition = Transition::new(from, to, now_ms, duration_ms, easing);
        let slot = self.transitions.entry(key).or_insert(transition);
        *slot = transition;
        slot
    }

    /// Jumps `key` straight to `value`, cancelling any running transition.
    pub fn set(&mut self, key: K, value: T, now_ms: f64) {
        self.insert(key, Transition::new(value, value, now_ms, 0.0, Easing::Linear));
    }

    /// Installs `transition` as given, without picking up where a running one is.
    pub fn insert(&mut self, key: K, transition: Transition<T>) {
        self.transitions.insert(key, transition);
    }

    pub fn get(&self, key: &K) -> Option<&Transition<T>> {
        self.transitions.get(key)
    }

    pub fn value(&self, key: &K, now_ms: f64) -> Option<T> {
        self.transitions.get(key).map(|t| t.value_at(now_ms))
    }

    pub fn remove(&mut self, key: &K) -> Option<Transition<T>> {
        self.transitions.shift_remove(key)
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.transitions.values().any(|t| !t.is_finished(now_ms))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.transitions.keys()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// The single camera move in flight. A new request replaces it, starting from wherever the
/// camera currently is.
#[derive(Debug, Clone, Default)]
pub struct CameraAnimation {
    current: Camera,
    transition: Option<Transition<Camera>>,
}

impl CameraAnimation {
    pub fn new(camera: Camera) -> Self {
        Self {
            current: camera,
            transition: None,
        }
    }

    pub fn animate_to(&mut self, target: Camera, now_ms: f64, duration_ms: f64, easing: Easing) {
        let from = self.value(now_ms);
        self.current = from;
        self.transition = Some(Transition::new(from, target, now_ms, duration_ms, easing));
    }

    pub fn jump_to(&mut self, camera: Camera) {
        self.current = camera;
        self.transition = None;
    }

    pub fn value(&self, now_ms: f64) -> Camera {
        self.transition
            .as_ref()
            .map_or(self.current, |t| t.value_at(now_ms))
    }

    /// Final camera once the current move completes.
    pub fn target(&self) -> Camera {
        self.transition.as_ref().map_or(self.current, |t| t.to)
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|t| !t.is_finished(now_ms))
    }

    /// Settles a finished move into the resting camera.
    pub fn tick(&mut self, now_ms: f64) -> Camera {
        let value = self.value(now_ms);
        if self.transition.as_ref().is_some_and(|t| t.is_finished(now_ms)) {
            self.current = value;
            self.transition = None;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        for e in [Easing::Linear, Easing::CubicInOut, Easing::CubicOut] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
        }
        assert_eq!(Easing::CubicInOut.apply(0.5), 0.5);
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
    }

    #[test]
    fn transition_clamps_outside_its_window() {
        let t = Transition::new(0.0, 10.0, 100.0, 50.0, Easing::Linear);
        assert_eq!(t.value_at(0.0), 0.0);
        assert_eq!(t.value_at(125.0), 5.0);
        assert_eq!(t.value_at(1_000.0), 10.0);
        assert!(t.is_finished(150.0));
    }

    #[test]
    fn zero_duration_is_immediately_finished() {
        let t = Transition::new(Point::ORIGIN, Point::new(3.0, 4.0), 0.0, 0.0, Easing::Linear);
        assert_eq!(t.value_at(0.0), Point::new(3.0, 4.0));
    }

    #[test]
    fn restart_mid_flight_starts_from_the_current_value() {
        let mut anim: Animator<&str, f64> = Animator::new();
        anim.start("a", 0.0, 100.0, 0.0, 100.0, Easing::Linear);
        let t = anim.start("a", 999.0, 0.0, 50.0, 100.0, Easing::Linear);
        assert_eq!(t.from, 50.0);
        assert_eq!(anim.value(&"a", 150.0), Some(0.0));
    }

    #[test]
    fn restart_after_finish_uses_the_given_start() {
        let mut anim: Animator<&str, f64> = Animator::new();
        anim.start("a", 0.0, 100.0, 0.0, 100.0, Easing::Linear);
        let t = anim.start("a", 7.0, 0.0, 500.0, 100.0, Easing::Linear);
        assert_eq!(t.from, 7.0);
    }

    #[test]
    fn camera_last_request_wins() {
        let mut cam = CameraAnimation::new(Camera::IDENTITY);
        cam.animate_to(Camera::new(100.0, 0.0, 1.0), 0.0, 100.0, Easing::Linear);
        cam.animate_to(Camera::new(0.0, 0.0, 2.0), 50.0, 100.0, Easing::Linear);
        assert_eq!(cam.value(50.0), Camera::new(50.0, 0.0, 1.0));
        assert_eq!(cam.target(), Camera::new(0.0, 0.0, 2.0));
        assert_eq!(cam.tick(200.0), Camera::new(0.0, 0.0, 2.0));
        assert!(!cam.is_animating(200.0));
    }
}
