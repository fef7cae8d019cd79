// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session Connector
//!
//! [`ChatKit`] is the process-wide context: it owns the service handle, the
//! task queue, the init state and the local caches, and sequences connect
//! with the post-connect reconciliation stages.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tracing::{debug, info, warn};

use super::identity::{profile_update, SessionAdapter, SessionIdentity};
use super::stage::run_stage;
use crate::config::ChatKitConfig;
use crate::emoji::EmojiCache;
use crate::error::{ChatKitError, ChatKitResult, ReconcileError};
use crate::notifications::NotificationSettingsStore;
use crate::runtime::{TaskQueue, UiDispatcher, UiThread, WorkerContext};
use crate::service::{
    ChatService, ConnectionState, InitParams, InitResultHandler, ServiceError, User,
    UserUpdateParams,
};
use crate::state::{InitState, InitStateCell};
use crate::storage::{FilePreferences, MemoryPreferences, Preferences};

/// Extension key registered with the service after a successful init.
pub const EXTENSION_KEY: &str = "chatkit";

/// Extension version registered alongside [`EXTENSION_KEY`].
pub const EXTENSION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of a connect call, as reported by the service.
#[derive(Debug)]
pub struct ConnectOutcome {
    pub user: Option<User>,
    pub error: Option<ChatKitError>,
}

impl ConnectOutcome {
    /// True when a user is present and no error was reported.
    pub fn is_connected(&self) -> bool {
        self.user.is_some() && self.error.is_none()
    }
}

struct Inner {
    config: ChatKitConfig,
    service: Arc<dyn ChatService>,
    adapter: Arc<dyn SessionAdapter>,
    queue: TaskQueue,
    ui: Arc<dyn UiDispatcher>,
    init_state: Arc<InitStateCell>,
    init_generation: Arc<AtomicU64>,
    emoji: Arc<EmojiCache>,
    notifications: Arc<NotificationSettingsStore>,
    prefs: Arc<dyn Preferences>,
}

/// Chat toolkit context.
///
/// Cheap to clone; clones share one context.
///
/// # Example
///
/// ```ignore
/// use chatkit_core::{ChatKit, ChatKitConfig, SessionIdentity};
///
/// let kit = ChatKit::builder(ChatKitConfig::new("APP_ID"))
///     .service(service)
///     .adapter(Arc::new(SessionIdentity::new("alice").with_nickname("Alice")))
///     .build()?;
///
/// kit.init(None);
/// kit.connect(|outcome| {
///     if outcome.is_connected() {
///         println!("connected");
///     }
/// });
/// ```
#[derive(Clone)]
pub struct ChatKit {
    inner: Arc<Inner>,
}

impl ChatKit {
    /// Returns a builder for `config`.
    pub fn builder(config: ChatKitConfig) -> ChatKitBuilder {
        ChatKitBuilder::new(config)
    }

    // === Lifecycle ===

    /// Initializes the service.
    ///
    /// Each call starts a new init cycle; callbacks still pending from an
    /// earlier cycle are ignored. Host callbacks run on the UI-affinity
    /// dispatcher after the init state has been updated.
    pub fn init(&self, host: Option<Arc<dyn InitResultHandler>>) {
        let inner = &self.inner;
        let generation = inner.init_generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, app_id = %inner.config.app_id, "starting init cycle");

        let cell = inner.init_state.clone();
        inner.ui.post(Box::new(move || cell.reset()));

        let handler = Arc::new(KitInitHandler {
            kit: Arc::downgrade(&self.inner),
            generation,
            host,
        });
        inner.service.init(
            InitParams {
                app_id: inner.config.app_id.clone(),
                use_caching: inner.config.use_caching,
            },
            handler,
        );
    }

    /// Connects and reconciles local state with the server.
    ///
    /// `handler` receives the service's connect result unchanged on the
    /// UI-affinity dispatcher, after every reconciliation stage has run.
    pub fn connect<F>(&self, handler: F)
    where
        F: FnOnce(ConnectOutcome) + Send + 'static,
    {
        let inner = self.inner.clone();
        self.inner.queue.submit(
            move |ctx| inner.run_connect(ctx),
            move |result| {
                let outcome = result.unwrap_or_else(|e| ConnectOutcome {
                    user: None,
                    error: Some(ChatKitError::Task(e)),
                });
                debug!(connected = outcome.is_connected(), "delivering connect outcome");
                handler(outcome)
            },
        );
    }

    /// Disconnects, then clears init state, caches and preferences.
    ///
    /// Safe to call when never connected.
    pub fn disconnect<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let inner = self.inner.clone();
        self.inner.service.disconnect(Box::new(move || {
            info!("disconnected");
            inner.clear_all();
            inner.ui.post(Box::new(handler));
        }));
    }

    /// Updates the current user's profile on the server.
    pub fn update_user_info<F>(&self, params: UserUpdateParams, handler: F)
    where
        F: FnOnce(Option<ChatKitError>) + Send + 'static,
    {
        let ui = self.inner.ui.clone();
        self.inner.service.update_current_user_info(
            params,
            Box::new(move |error| {
                let error = error.map(ChatKitError::Connection);
                ui.post(Box::new(move || handler(error)));
            }),
        );
    }

    // === Accessors ===

    pub fn config(&self) -> &ChatKitConfig {
        &self.inner.config
    }

    pub fn service(&self) -> &Arc<dyn ChatService> {
        &self.inner.service
    }

    pub fn ui(&self) -> &Arc<dyn UiDispatcher> {
        &self.inner.ui
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.service.connection_state()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.service.current_user()
    }

    pub fn init_state(&self) -> InitState {
        self.inner.init_state.current()
    }

    /// Subscribes to init state changes. The current value is not replayed.
    pub fn subscribe_init_state(&self) -> flume::Receiver<InitState> {
        self.inner.init_state.subscribe()
    }

    pub fn emoji_cache(&self) -> &Arc<EmojiCache> {
        &self.inner.emoji
    }

    pub fn notifications(&self) -> &Arc<NotificationSettingsStore> {
        &self.inner.notifications
    }

    pub fn preferences(&self) -> &Arc<dyn Preferences> {
        &self.inner.prefs
    }
}

impl Inner {
    fn is_current_generation(&self, generation: u64) -> bool {
        self.init_generation.load(Ordering::SeqCst) == generation
    }

    /// Connect job body. Runs on the task queue worker.
    fn run_connect(&self, ctx: &WorkerContext) -> ConnectOutcome {
        let identity = self.adapter.identity();
        let service = self.service.clone();

        let connected = ctx.await_once(|done| {
            service.connect(
                &identity.user_id,
                identity.access_token.as_deref(),
                Box::new(move |user, error| done.complete((user, error))),
            )
        });
        let (user, error) = match connected {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "connect callback never arrived");
                return ConnectOutcome {
                    user: None,
                    error: Some(ChatKitError::Bridge(e)),
                };
            }
        };

        match (&user, &error) {
            (Some(user), None) if self.service.connection_state() == ConnectionState::Open => {
                info!(user_id = %user.user_id, "connected");
                self.reconcile(ctx, &identity, user);
            }
            (_, Some(e)) => warn!(error = %e, "connect failed"),
            _ => debug!("connect returned without an open session, skipping reconciliation"),
        }

        ConnectOutcome {
            user,
            error: error.map(ChatKitError::Connection),
        }
    }

    /// Post-connect stages. Each is isolated; none affects the outcome.
    fn reconcile(&self, ctx: &WorkerContext, identity: &SessionIdentity, user: &User) {
        let mut outcomes = vec![run_stage("profile_sync", || {
            self.sync_profile(ctx, identity, user)
        })];

        match self.service.app_info() {
            Some(app_info) => {
                if app_info.use_reaction && self.emoji.needs_refresh(&app_info.emoji_hash) {
                    outcomes.push(run_stage("emoji_refresh", || self.refresh_emoji(ctx)));
                }

                if let Some(info) = app_info.notification_info.filter(|n| n.enabled) {
                    outcomes.push(run_stage("notification_templates", || {
                        self.notifications
                            .sync_template_list(ctx, &info.template_list_token)
                            .map(|_| ())
                    }));
                    outcomes.push(run_stage("notification_channel_settings", || {
                        self.notifications
                            .sync_channel_settings(ctx, info.settings_updated_at)
                            .map(|_| ())
                    }));
                }
            }
            None => debug!("no app info, skipping emoji and notification sync"),
        }

        let failed = outcomes.iter().filter(|o| !o.is_completed()).count();
        debug!(stages = outcomes.len(), failed, "reconciliation finished");
    }

    fn sync_profile(
        &self,
        ctx: &WorkerContext,
        identity: &SessionIdentity,
        user: &User,
    ) -> Result<(), ReconcileError> {
        let Some(params) = profile_update(identity, user, self.config.use_user_id_for_nickname)
        else {
            return Ok(());
        };

        debug!(?params, "pushing profile update");
        let service = self.service.clone();
        let error: Option<ServiceError> = ctx.await_once(|done| {
            service.update_current_user_info(params, Box::new(move |e| done.complete(e)))
        })?;
        match error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn refresh_emoji(&self, ctx: &WorkerContext) -> Result<(), ReconcileError> {
        let service = self.service.clone();
        let container = ctx.await_once(|done| {
            service.get_all_emoji(Box::new(move |result| done.complete(result)))
        })??;
        self.emoji.upsert(container)?;
        Ok(())
    }

    /// Stage bodies run after the service reports init success.
    fn on_init_succeeded(&self) {
        run_stage("notification_store_init", || {
            self.notifications.init();
            Ok(())
        });
        run_stage("emoji_cache_init", || {
            self.emoji.init();
            Ok(())
        });
        run_stage("add_extension", || {
            self.service.add_extension(EXTENSION_KEY, EXTENSION_VERSION);
            Ok(())
        });
    }

    /// Resets everything derived from the session.
    fn clear_all(&self) {
        self.init_generation.fetch_add(1, Ordering::SeqCst);
        let cell = self.init_state.clone();
        self.ui.post(Box::new(move || cell.reset()));
        self.emoji.clear();
        self.notifications.clear();
        if let Err(e) = self.prefs.clear() {
            warn!(error = %e, "failed to clear preferences");
        }
    }

    /// Posts a state write for init cycle `generation`.
    ///
    /// The generation is checked again on the dispatcher, so a cycle that is
    /// superseded while its stages run never writes the state or calls back.
    fn post_state(
        &self,
        state: InitState,
        generation: u64,
        then: Option<Box<dyn FnOnce() + Send>>,
    ) {
        let cell = self.init_state.clone();
        let current = self.init_generation.clone();
        self.ui.post(Box::new(move || {
            if current.load(Ordering::SeqCst) != generation {
                debug!(generation, ?state, "dropping state write from superseded init cycle");
                return;
            }
            cell.transition(state);
            if let Some(then) = then {
                then();
            }
        }));
    }
}

/// Adapts service init callbacks to the context's init state.
struct KitInitHandler {
    kit: Weak<Inner>,
    generation: u64,
    host: Option<Arc<dyn InitResultHandler>>,
}

impl KitInitHandler {
    fn live(&self) -> Option<Arc<Inner>> {
        let inner = self.kit.upgrade()?;
        if !inner.is_current_generation(self.generation) {
            debug!(generation = self.generation, "ignoring callback from superseded init cycle");
            return None;
        }
        Some(inner)
    }

    fn host_callback<F>(&self, f: F) -> Option<Box<dyn FnOnce() + Send>>
    where
        F: FnOnce(&dyn InitResultHandler) + Send + 'static,
    {
        let host = self.host.clone()?;
        let callback: Box<dyn FnOnce() + Send> = Box::new(move || f(host.as_ref()));
        Some(callback)
    }
}

impl InitResultHandler for KitInitHandler {
    fn on_migration_started(&self) {
        let Some(inner) = self.live() else { return };
        info!("local data migration started");
        inner.post_state(
            InitState::Migrating,
            self.generation,
            self.host_callback(|h| h.on_migration_started()),
        );
    }

    fn on_init_failed(&self, error: ServiceError) {
        let Some(inner) = self.live() else { return };
        warn!(error = %error, "init failed");
        inner.post_state(
            InitState::Failed,
            self.generation,
            self.host_callback(move |h| h.on_init_failed(error)),
        );
    }

    fn on_init_succeeded(&self) {
        let Some(inner) = self.live() else { return };
        inner.on_init_succeeded();
        inner.post_state(
            InitState::Succeeded,
            self.generation,
            self.host_callback(|h| h.on_init_succeeded()),
        );
    }
}

/// Builder for [`ChatKit`].
pub struct ChatKitBuilder {
    config: ChatKitConfig,
    service: Option<Arc<dyn ChatService>>,
    adapter: Option<Arc<dyn SessionAdapter>>,
    dispatcher: Option<Arc<dyn UiDispatcher>>,
    prefs: Option<Arc<dyn Preferences>>,
}

impl ChatKitBuilder {
    /// Creates a builder for `config`.
    pub fn new(config: ChatKitConfig) -> Self {
        ChatKitBuilder {
            config,
            service: None,
            adapter: None,
            dispatcher: None,
            prefs: None,
        }
    }

    /// Sets the messaging service. Required.
    pub fn service(mut self, service: Arc<dyn ChatService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the identity source. Required.
    pub fn adapter(mut self, adapter: Arc<dyn SessionAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Sets the UI-affinity dispatcher. Defaults to a dedicated [`UiThread`].
    pub fn dispatcher(mut self, dispatcher: Arc<dyn UiDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Sets the preferences store. Defaults to file preferences in
    /// `config.data_dir`, or memory when no directory is configured.
    pub fn preferences(mut self, prefs: Arc<dyn Preferences>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    /// Builds the context.
    pub fn build(self) -> ChatKitResult<ChatKit> {
        self.config.validate()?;
        let service = self
            .service
            .ok_or_else(|| ChatKitError::Configuration("service is required".into()))?;
        let adapter = self
            .adapter
            .ok_or_else(|| ChatKitError::Configuration("session adapter is required".into()))?;

        let ui: Arc<dyn UiDispatcher> = match self.dispatcher {
            Some(ui) => ui,
            None => Arc::new(UiThread::spawn()?),
        };
        let prefs: Arc<dyn Preferences> = match (self.prefs, &self.config.data_dir) {
            (Some(prefs), _) => prefs,
            (None, Some(dir)) => Arc::new(FilePreferences::open(dir)?),
            (None, None) => Arc::new(MemoryPreferences::new()),
        };

        let queue = TaskQueue::new(ui.clone())?;
        let emoji = Arc::new(EmojiCache::new(prefs.clone()));
        let notifications = Arc::new(NotificationSettingsStore::new(
            service.clone(),
            prefs.clone(),
        ));

        Ok(ChatKit {
            inner: Arc::new(Inner {
                config: self.config,
                service,
                adapter,
                queue,
                ui,
                init_state: Arc::new(InitStateCell::new()),
                init_generation: Arc::new(AtomicU64::new(0)),
                emoji,
                notifications,
                prefs,
            }),
        })
    }
}
