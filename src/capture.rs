//! Window input capture for rendered builds.
//!
//! Keyboard and touch messages from the windowing backend are forwarded to
//! the live [`InputSubscription`]; the world reads the resulting snapshot.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use glam::Vec2;

use crate::input::{InputSubscription, TouchTracker};
use crate::world::WorldSet;

fn forward_keys(
    listener: Option<Res<InputSubscription>>,
    mut keys: MessageReader<KeyboardInput>,
) {
    let Some(subscription) = listener else {
        keys.clear();
        return;
    };
    for event in keys.read() {
        let Key::Character(text) = &event.logical_key else {
            continue;
        };
        match event.state {
            ButtonState::Pressed => subscription.key_down(text),
            ButtonState::Released => subscription.key_up(text),
        };
    }
}

fn forward_touches(
    listener: Option<Res<InputSubscription>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut touches: MessageReader<TouchInput>,
    mut tracker: Local<TouchTracker>,
) {
    let Some(subscription) = listener else {
        touches.clear();
        return;
    };
    let viewport_width = windows.single().map_or(f32::INFINITY, Window::width);
    for touch in touches.read() {
        match touch.phase {
            TouchPhase::Started => {
                tracker.start(touch.position, viewport_width);
            }
            TouchPhase::Moved => {
                if let Some(vector) = tracker.drag(touch.position) {
                    subscription.set_joystick(vector);
                }
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                if tracker.is_active() {
                    tracker.end();
                    subscription.set_joystick(Vec2::ZERO);
                }
            }
        }
    }
}

/// Registers the capture systems ahead of the input snapshot.
pub(crate) fn add_capture_systems(app: &mut App) {
    app.add_systems(
        Update,
        (forward_keys, forward_touches).before(WorldSet::Input),
    );
}
