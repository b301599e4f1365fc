//! Compile-time guards on the ownership of input listeners and state types.
use static_assertions::{assert_impl_all, assert_not_impl_any};
use syzran::{
    InputState, InputSubscription, InputSurface, Mover, PatrolAgent, SceneConfig, TickPolicy,
};

// Only one live subscription may exist per surface.
assert_not_impl_any!(InputSubscription: Clone, Copy);
assert_impl_all!(InputSubscription: Send, Sync);
assert_impl_all!(InputSurface: Clone, Send, Sync);

assert_impl_all!(InputState: Clone, Default, Send, Sync);
assert_impl_all!(Mover: Copy, Send, Sync, serde::Serialize);
assert_impl_all!(PatrolAgent: Copy, Send, Sync, serde::Serialize);
assert_impl_all!(TickPolicy: Copy, Eq);
assert_impl_all!(SceneConfig: Clone, Default, serde::Serialize);
