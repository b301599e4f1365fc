//! Player input: held movement keys and the analog touch joystick.
//!
//! [`InputState`] is the per-tick snapshot the avatar reads. It is filled by
//! an [`InputSubscription`], the single live registration on the shared
//! [`InputSurface`]. Dropping the subscription detaches the listeners and
//! clears everything they were holding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::Resource;
use glam::Vec2;
use hashbrown::HashSet;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::JOYSTICK_RADIUS_PX;

/// One of the four planar movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKey {
    /// Towards `-z`.
    Forward,
    /// Towards `+z`.
    Back,
    /// Towards `-x`.
    Left,
    /// Towards `+x`.
    Right,
}

impl MoveKey {
    /// Resolves a logical key name, ignoring case.
    ///
    /// Both the Latin WASD keys and the keys in the same positions on a
    /// Russian layout are recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use syzran::input::MoveKey;
    /// assert_eq!(MoveKey::from_key("W"), Some(MoveKey::Forward));
    /// assert_eq!(MoveKey::from_key("ф"), Some(MoveKey::Left));
    /// assert_eq!(MoveKey::from_key("Shift"), None);
    /// ```
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "ц" => Some(Self::Forward),
            "s" | "ы" => Some(Self::Back),
            "a" | "ф" => Some(Self::Left),
            "d" | "в" => Some(Self::Right),
            _ => None,
        }
    }

    /// Unit planar direction as `(x, z)`.
    #[must_use]
    pub const fn direction(self) -> Vec2 {
        match self {
            Self::Forward => Vec2::new(0.0, -1.0),
            Self::Back => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Input snapshot consumed by the avatar each tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputState {
    held: HashSet<MoveKey>,
    joystick: Vec2,
}

impl InputState {
    /// Handles a key-down event. Returns `true` if the key moves the avatar.
    pub fn key_down(&mut self, key: &str) -> bool {
        MoveKey::from_key(key).is_some_and(|k| {
            self.press(k);
            true
        })
    }

    /// Handles a key-up event. Returns `true` if the key moves the avatar.
    pub fn key_up(&mut self, key: &str) -> bool {
        MoveKey::from_key(key).is_some_and(|k| {
            self.release(k);
            true
        })
    }

    /// Marks `key` as held.
    pub fn press(&mut self, key: MoveKey) {
        self.held.insert(key);
    }

    /// Marks `key` as released.
    pub fn release(&mut self, key: MoveKey) {
        self.held.remove(&key);
    }

    /// Whether `key` is currently held.
    #[must_use]
    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }

    /// Iterates the held keys in no particular order.
    pub fn held(&self) -> impl Iterator<Item = MoveKey> + '_ {
        self.held.iter().copied()
    }

    /// Sets the analog vector, clamping each axis into `[-1, 1]`.
    ///
    /// Non-finite axes are treated as neutral.
    pub fn set_joystick(&mut self, vector: Vec2) {
        let axis = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        self.joystick = Vec2::new(axis(vector.x), axis(vector.y));
    }

    /// Current analog vector as `(x, z)`.
    #[must_use]
    pub const fn joystick(&self) -> Vec2 {
        self.joystick
    }

    /// Releases every key and centres the joystick.
    pub fn clear(&mut self) {
        self.held.clear();
        self.joystick = Vec2::ZERO;
    }

    /// `true` when no key is held and the joystick is centred.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.held.is_empty() && self.joystick == Vec2::ZERO
    }
}

/// Converts a drag offset in pixels into a joystick vector.
///
/// The offset is capped at `radius` while keeping its direction, so each
/// axis of the result lies in `[-1, 1]`.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use syzran::input::joystick_from_drag;
/// let v = joystick_from_drag(Vec2::new(25.0, 0.0), 50.0);
/// assert!((v.x - 0.5).abs() < 1e-6);
/// let capped = joystick_from_drag(Vec2::new(300.0, 400.0), 50.0);
/// assert!((capped.length() - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn joystick_from_drag(delta: Vec2, radius: f32) -> Vec2 {
    if radius.is_nan() || radius <= 0.0 || !delta.is_finite() {
        return Vec2::ZERO;
    }
    let length = delta.length();
    if length <= f32::EPSILON {
        return Vec2::ZERO;
    }
    delta / length * length.min(radius) / radius
}

/// Tracks one touch drag on the left half of the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchTracker {
    origin: Option<Vec2>,
    radius: f32,
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new(JOYSTICK_RADIUS_PX)
    }
}

impl TouchTracker {
    /// Creates a tracker saturating at `radius` pixels.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self {
            origin: None,
            radius,
        }
    }

    /// Begins a drag at `position`. Touches on the right half of a viewport
    /// `viewport_width` pixels wide are left to the camera and ignored.
    pub const fn start(&mut self, position: Vec2, viewport_width: f32) -> bool {
        if position.x > viewport_width / 2.0 {
            return false;
        }
        self.origin = Some(position);
        true
    }

    /// Joystick vector for the drag now at `position`, if a drag is active.
    #[must_use]
    pub fn drag(&self, position: Vec2) -> Option<Vec2> {
        self.origin
            .map(|origin| joystick_from_drag(position - origin, self.radius))
    }

    /// Ends the drag.
    pub const fn end(&mut self) {
        self.origin = None;
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}

/// Errors raised by [`InputSurface`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// Listeners are already registered; a second set would double every
    /// event.
    #[error("input listeners are already attached to this surface")]
    AlreadyAttached,
}

#[derive(Debug, Default)]
struct SurfaceInner {
    attached: AtomicBool,
    state: Mutex<InputState>,
}

impl SurfaceInner {
    fn lock(&self) -> MutexGuard<'_, InputState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The shared input source that event listeners attach to.
///
/// Clones refer to the same surface.
#[derive(Debug, Clone, Default)]
pub struct InputSurface {
    inner: Arc<SurfaceInner>,
}

impl InputSurface {
    /// Registers listeners on the surface.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::AlreadyAttached`] while another subscription is
    /// alive.
    pub fn attach(&self) -> Result<InputSubscription, InputError> {
        if self
            .inner
            .attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(InputError::AlreadyAttached);
        }
        info!("input listeners attached");
        Ok(InputSubscription {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Whether a subscription is currently alive.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.attached.load(Ordering::Acquire)
    }

    /// Copy of the current input state.
    #[must_use]
    pub fn snapshot(&self) -> InputState {
        self.inner.lock().clone()
    }
}

/// Live listener registration. Detaches exactly once, on drop.
#[derive(Debug, Resource)]
pub struct InputSubscription {
    inner: Arc<SurfaceInner>,
}

impl InputSubscription {
    /// Forwards a key-down event.
    pub fn key_down(&self, key: &str) -> bool {
        let handled = self.inner.lock().key_down(key);
        if handled {
            debug!("key down: {key}");
        }
        handled
    }

    /// Forwards a key-up event.
    pub fn key_up(&self, key: &str) -> bool {
        self.inner.lock().key_up(key)
    }

    /// Forwards a joystick update.
    pub fn set_joystick(&self, vector: Vec2) {
        self.inner.lock().set_joystick(vector);
    }

    /// Copy of the current input state.
    #[must_use]
    pub fn snapshot(&self) -> InputState {
        self.inner.lock().clone()
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        self.inner.lock().clear();
        self.inner.attached.store(false, Ordering::Release);
        info!("input listeners detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("w", MoveKey::Forward)]
    #[case("W", MoveKey::Forward)]
    #[case("ц", MoveKey::Forward)]
    #[case("Ц", MoveKey::Forward)]
    #[case("s", MoveKey::Back)]
    #[case("Ы", MoveKey::Back)]
    #[case("a", MoveKey::Left)]
    #[case("ф", MoveKey::Left)]
    #[case("D", MoveKey::Right)]
    #[case("в", MoveKey::Right)]
    fn resolves_latin_and_cyrillic_keys(#[case] key: &str, #[case] expected: MoveKey) {
        assert_eq!(MoveKey::from_key(key), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("q")]
    #[case("ArrowUp")]
    #[case("wa")]
    fn ignores_other_keys(#[case] key: &str) {
        assert_eq!(MoveKey::from_key(key), None);
    }

    #[test]
    fn key_events_toggle_held_state() {
        let mut input = InputState::default();
        assert!(input.key_down("W"));
        assert!(input.is_held(MoveKey::Forward));
        assert!(!input.key_down("space"));
        assert!(input.key_up("ц"));
        assert!(!input.is_held(MoveKey::Forward));
        assert!(input.is_idle());
    }

    #[rstest]
    #[case(Vec2::new(2.0, -3.0), Vec2::new(1.0, -1.0))]
    #[case(Vec2::new(0.25, 0.5), Vec2::new(0.25, 0.5))]
    #[case(Vec2::new(f32::NAN, 0.5), Vec2::new(0.0, 0.5))]
    fn joystick_is_clamped(#[case] raw: Vec2, #[case] expected: Vec2) {
        let mut input = InputState::default();
        input.set_joystick(raw);
        assert_eq!(input.joystick(), expected);
    }

    #[rstest]
    #[case(Vec2::ZERO, 50.0, Vec2::ZERO)]
    #[case(Vec2::new(0.0, -10.0), 50.0, Vec2::new(0.0, -0.2))]
    #[case(Vec2::new(30.0, 40.0), 50.0, Vec2::new(0.6, 0.8))]
    #[case(Vec2::new(60.0, 80.0), 50.0, Vec2::new(0.6, 0.8))]
    #[case(Vec2::new(10.0, 10.0), 0.0, Vec2::ZERO)]
    fn drag_maps_into_unit_disc(#[case] delta: Vec2, #[case] radius: f32, #[case] expected: Vec2) {
        let v = joystick_from_drag(delta, radius);
        assert_relative_eq!(v.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(v.y, expected.y, epsilon = 1e-6);
    }

    #[test]
    fn touch_on_right_half_is_ignored() {
        let mut tracker = TouchTracker::default();
        assert!(!tracker.start(Vec2::new(700.0, 300.0), 1000.0));
        assert!(!tracker.is_active());
        assert_eq!(tracker.drag(Vec2::new(710.0, 300.0)), None);
    }

    #[test]
    fn touch_drag_lifecycle() {
        let mut tracker = TouchTracker::default();
        assert!(tracker.start(Vec2::new(100.0, 300.0), 1000.0));
        let v = tracker.drag(Vec2::new(125.0, 300.0)).unwrap_or_default();
        assert_relative_eq!(v.x, 0.5, epsilon = 1e-6);
        tracker.end();
        assert!(!tracker.is_active());
    }

    #[test]
    fn surface_allows_a_single_subscription() {
        let surface = InputSurface::default();
        let first = surface.attach();
        assert!(first.is_ok());
        assert_eq!(surface.attach().err(), Some(InputError::AlreadyAttached));
        drop(first);
        assert!(!surface.is_attached());
        assert!(surface.attach().is_ok());
    }

    #[test]
    fn detaching_releases_held_input() {
        let surface = InputSurface::default();
        let Ok(subscription) = surface.attach() else {
            panic!("fresh surface must accept a subscription");
        };
        subscription.key_down("d");
        subscription.set_joystick(Vec2::new(0.5, 0.5));
        assert!(!surface.snapshot().is_idle());
        drop(subscription);
        assert!(surface.snapshot().is_idle());
    }
}
