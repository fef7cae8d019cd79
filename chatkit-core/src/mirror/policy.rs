//! Event classification for mirrored channels.

use crate::service::{Channel, ChannelEvent, ChannelKind, User};

/// What a push event means for a mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEffect {
    /// Not relevant to this screen.
    Ignore,
    /// Replace the local snapshot.
    Update(Channel),
    /// The owning screen should close.
    Terminate,
    /// Replace the snapshot, then close.
    UpdateAndTerminate(Channel),
}

/// Screen-specific mapping from push events to [`EventEffect`]s.
///
/// Events reach `classify` only after the mirror has matched them to its
/// bound channel.
pub trait MirrorPolicy: Send + Sync + 'static {
    /// Prefix of the subscription key; a UUID is appended per mirror.
    const KEY_PREFIX: &'static str;

    /// Kind of channel fetched on authenticate.
    fn kind(&self) -> ChannelKind;

    /// Classifies `event`. `current_user` is the connected user, if known.
    fn classify(&self, event: &ChannelEvent, current_user: Option<&User>) -> EventEffect;
}

fn is_current(user: &User, current_user: Option<&User>) -> bool {
    current_user.is_some_and(|me| me.user_id == user.user_id)
}

/// Open channel settings screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenChannelSettingsPolicy;

impl MirrorPolicy for OpenChannelSettingsPolicy {
    const KEY_PREFIX: &'static str = "OPEN_CHANNEL_SETTINGS";

    fn kind(&self) -> ChannelKind {
        ChannelKind::Open
    }

    fn classify(&self, event: &ChannelEvent, current_user: Option<&User>) -> EventEffect {
        match event {
            ChannelEvent::UserEntered { channel, .. }
            | ChannelEvent::UserExited { channel, .. }
            | ChannelEvent::ChannelChanged { channel } => EventEffect::Update(channel.clone()),
            ChannelEvent::OperatorUpdated { channel } => match current_user {
                Some(me) if !channel.is_operator(&me.user_id) => {
                    EventEffect::UpdateAndTerminate(channel.clone())
                }
                _ => EventEffect::Update(channel.clone()),
            },
            ChannelEvent::ChannelDeleted { .. } => EventEffect::Terminate,
            ChannelEvent::UserBanned { user, .. } if is_current(user, current_user) => {
                EventEffect::Terminate
            }
            _ => EventEffect::Ignore,
        }
    }
}

/// Group channel settings screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupChannelSettingsPolicy;

impl MirrorPolicy for GroupChannelSettingsPolicy {
    const KEY_PREFIX: &'static str = "GROUP_CHANNEL_SETTINGS";

    fn kind(&self) -> ChannelKind {
        ChannelKind::Group
    }

    fn classify(&self, event: &ChannelEvent, current_user: Option<&User>) -> EventEffect {
        match event {
            ChannelEvent::UserLeft { user, .. } if is_current(user, current_user) => {
                EventEffect::Terminate
            }
            ChannelEvent::UserBanned { user, .. } if is_current(user, current_user) => {
                EventEffect::Terminate
            }
            ChannelEvent::UserJoined { channel, .. }
            | ChannelEvent::UserLeft { channel, .. }
            | ChannelEvent::ChannelChanged { channel }
            | ChannelEvent::OperatorUpdated { channel }
            | ChannelEvent::ChannelFrozen { channel }
            | ChannelEvent::ChannelUnfrozen { channel } => EventEffect::Update(channel.clone()),
            ChannelEvent::ChannelDeleted { .. } => EventEffect::Terminate,
            _ => EventEffect::Ignore,
        }
    }
}
