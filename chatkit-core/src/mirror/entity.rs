// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entity Mirror
//!
//! Screen-scoped live copy of one remote channel.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::policy::{EventEffect, MirrorPolicy};
use crate::error::{ChatKitError, ChatKitResult};
use crate::service::{Channel, ChannelEvent, ChannelUpdateParams, ChatService, EventHandler};
use crate::session::ChatKit;

/// Notification from a mirror to its owning screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorSignal {
    /// The mirrored channel changed.
    Updated(Channel),
    /// The screen should close. Sent at most once.
    ShouldFinish,
}

#[derive(Default)]
struct MirrorState {
    entity: Option<Channel>,
    registered: bool,
    torn_down: bool,
    finish_signaled: bool,
}

struct Shared<P> {
    policy: P,
    identity: String,
    owner_key: String,
    service: Arc<dyn ChatService>,
    state: Mutex<MirrorState>,
    signals: flume::Sender<MirrorSignal>,
}

impl<P: MirrorPolicy> Shared<P> {
    /// Stores the fetched channel and registers for events.
    ///
    /// Returns false if the mirror was torn down while the fetch was in flight.
    /// The service is never called with `state` held: its event dispatch
    /// takes `state` through [`Self::handle`].
    fn bind(self: &Arc<Self>, channel: Channel) -> bool {
        let register = {
            let mut state = self.state.lock();
            if state.torn_down {
                debug!(key = %self.owner_key, "mirror torn down before bind, not registering");
                return false;
            }
            state.entity = Some(channel);
            !std::mem::replace(&mut state.registered, true)
        };
        if !register {
            return true;
        }

        let handler = Arc::new(MirrorHandler {
            shared: Arc::downgrade(self),
        });
        self.service.add_event_handler(&self.owner_key, handler);

        if self.state.lock().torn_down {
            self.service.remove_event_handler(&self.owner_key);
            debug!(key = %self.owner_key, "mirror torn down during bind, unsubscribed");
            return false;
        }
        debug!(key = %self.owner_key, "mirror subscribed");
        true
    }

    fn handle(&self, event: ChannelEvent) {
        let current_user = self.service.current_user();
        let mut state = self.state.lock();
        if state.torn_down || state.finish_signaled {
            return;
        }
        let Some(bound) = state.entity.as_ref() else {
            return;
        };
        if event.channel_url() != bound.url {
            return;
        }

        match self.policy.classify(&event, current_user.as_ref()) {
            EventEffect::Ignore => {}
            EventEffect::Update(channel) => self.apply(&mut state, channel),
            EventEffect::Terminate => self.finish(&mut state),
            EventEffect::UpdateAndTerminate(channel) => {
                self.apply(&mut state, channel);
                self.finish(&mut state);
            }
        }
    }

    fn apply(&self, state: &mut MirrorState, channel: Channel) {
        state.entity = Some(channel.clone());
        let _ = self.signals.send(MirrorSignal::Updated(channel));
    }

    fn finish(&self, state: &mut MirrorState) {
        if state.finish_signaled {
            return;
        }
        state.finish_signaled = true;
        info!(key = %self.owner_key, identity = %self.identity, "mirror should finish");
        let _ = self.signals.send(MirrorSignal::ShouldFinish);
    }

    fn teardown(&self) {
        let registered = {
            let mut state = self.state.lock();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
            std::mem::take(&mut state.registered)
        };
        if registered {
            self.service.remove_event_handler(&self.owner_key);
            debug!(key = %self.owner_key, "mirror unsubscribed");
        }
    }
}

/// Registered with the service; inert once the mirror is gone.
struct MirrorHandler<P> {
    shared: Weak<Shared<P>>,
}

impl<P: MirrorPolicy> EventHandler for MirrorHandler<P> {
    fn on_event(&self, event: ChannelEvent) {
        if let Some(shared) = self.shared.upgrade() {
            shared.handle(event);
        }
    }
}

/// Live copy of one channel, kept current by push events.
///
/// Created unbound; [`authenticate`](Self::authenticate) connects, fetches
/// the channel and subscribes. Changes arrive on [`signals`](Self::signals).
/// Dropping the mirror tears it down.
///
/// # Example
///
/// ```ignore
/// let mirror = OpenChannelSettings::new(&kit, "channel-url", OpenChannelSettingsPolicy);
/// let signals = mirror.signals();
/// mirror.authenticate(|result| println!("bound: {:?}", result.is_ok()));
///
/// while let Ok(signal) = signals.recv() {
///     match signal {
///         MirrorSignal::Updated(channel) => render(&channel),
///         MirrorSignal::ShouldFinish => break,
///     }
/// }
/// ```
pub struct EntityMirror<P: MirrorPolicy> {
    kit: ChatKit,
    shared: Arc<Shared<P>>,
    signals: flume::Receiver<MirrorSignal>,
}

impl<P: MirrorPolicy> EntityMirror<P> {
    /// Creates an unbound mirror for the channel at `identity`.
    pub fn new(kit: &ChatKit, identity: impl Into<String>, policy: P) -> Self {
        let (tx, rx) = flume::unbounded();
        let owner_key = format!("{}_{}", P::KEY_PREFIX, Uuid::new_v4());
        EntityMirror {
            kit: kit.clone(),
            shared: Arc::new(Shared {
                policy,
                identity: identity.into(),
                owner_key,
                service: kit.service().clone(),
                state: Mutex::new(MirrorState::default()),
                signals: tx,
            }),
            signals: rx,
        }
    }

    /// Connects, fetches the channel and subscribes to its events.
    ///
    /// `handler` runs on the UI-affinity dispatcher with the fetched channel,
    /// or `AuthenticationFailed` if connecting or fetching failed.
    pub fn authenticate<F>(&self, handler: F)
    where
        F: FnOnce(ChatKitResult<Channel>) + Send + 'static,
    {
        let shared = self.shared.clone();
        let ui = self.kit.ui().clone();
        self.kit.connect(move |outcome| {
            if !outcome.is_connected() {
                let reason = outcome
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no user".to_string());
                warn!(identity = %shared.identity, %reason, "mirror connect failed");
                handler(Err(ChatKitError::AuthenticationFailed(reason)));
                return;
            }

            let kind = shared.policy.kind();
            let bound = shared.clone();
            shared.service.get_channel(
                kind,
                &shared.identity,
                Box::new(move |result| {
                    let result = match result {
                        Ok(channel) if bound.bind(channel.clone()) => Ok(channel),
                        Ok(_) => Err(ChatKitError::InvalidState("mirror torn down".into())),
                        Err(e) => {
                            warn!(identity = %bound.identity, error = %e, "channel fetch failed");
                            Err(ChatKitError::AuthenticationFailed(e.to_string()))
                        }
                    };
                    ui.post(Box::new(move || handler(result)));
                }),
            );
        });
    }

    /// Updates the bound channel on the server.
    ///
    /// Fails with `NotFound` immediately when unbound.
    pub fn update<F>(&self, params: ChannelUpdateParams, handler: F)
    where
        F: FnOnce(ChatKitResult<Channel>) + Send + 'static,
    {
        let Some(channel) = self.entity() else {
            handler(Err(ChatKitError::NotFound(self.shared.identity.clone())));
            return;
        };
        let ui = self.kit.ui().clone();
        self.shared.service.update_channel(
            &channel.url,
            params,
            Box::new(move |result| {
                let result = result.map_err(ChatKitError::Connection);
                ui.post(Box::new(move || handler(result)));
            }),
        );
    }

    /// Deletes the bound channel on the server.
    ///
    /// Fails with `NotFound` immediately when unbound.
    pub fn delete<F>(&self, handler: F)
    where
        F: FnOnce(ChatKitResult<()>) + Send + 'static,
    {
        let Some(channel) = self.entity() else {
            handler(Err(ChatKitError::NotFound(self.shared.identity.clone())));
            return;
        };
        let ui = self.kit.ui().clone();
        self.shared.service.delete_channel(
            &channel.url,
            Box::new(move |error| {
                let result = match error {
                    Some(e) => Err(ChatKitError::Connection(e)),
                    None => Ok(()),
                };
                ui.post(Box::new(move || handler(result)));
            }),
        );
    }

    /// Unsubscribes. Idempotent; later events and fetch results are ignored.
    pub fn teardown(&self) {
        self.shared.teardown();
    }

    /// Current snapshot of the bound channel.
    pub fn entity(&self) -> Option<Channel> {
        self.shared.state.lock().entity.clone()
    }

    /// URL of the mirrored channel.
    pub fn identity(&self) -> &str {
        &self.shared.identity
    }

    /// Subscription key, unique per mirror.
    pub fn owner_key(&self) -> &str {
        &self.shared.owner_key
    }

    /// Receiver of update and finish signals.
    pub fn signals(&self) -> flume::Receiver<MirrorSignal> {
        self.signals.clone()
    }

    pub fn should_finish(&self) -> bool {
        self.shared.state.lock().finish_signaled
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.state.lock().torn_down
    }
}

impl<P: MirrorPolicy> Drop for EntityMirror<P> {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}
