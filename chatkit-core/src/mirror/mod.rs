//! Entity mirrors
//!
//! A mirror holds a local copy of one remote channel for the lifetime of a
//! screen. Push events for that channel are classified by a
//! [`MirrorPolicy`]: they update the copy, close the screen, or are ignored.

mod entity;
mod policy;

pub use entity::{EntityMirror, MirrorSignal};
pub use policy::{EventEffect, GroupChannelSettingsPolicy, MirrorPolicy, OpenChannelSettingsPolicy};

/// Mirror backing an open channel settings screen.
pub type OpenChannelSettings = EntityMirror<OpenChannelSettingsPolicy>;

/// Mirror backing a group channel settings screen.
pub type GroupChannelSettings = EntityMirror<GroupChannelSettingsPolicy>;
