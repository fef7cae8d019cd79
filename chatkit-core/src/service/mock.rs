//! Mock Service
//!
//! Scriptable implementation of [`ChatService`] for tests and demos.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use super::events::{ChannelEvent, EventHandler, InitResultHandler};
use super::types::{
    AppInfo, Channel, ChannelHandler, ChannelKind, ChannelSettingsHandler, ChannelUpdateParams,
    CompletionHandler, ConnectHandler, ConnectionState, DisconnectHandler, EmojiContainerHandler,
    InitParams, NotificationChannelSettings, NotificationTemplateList, ServiceError,
    ServiceResult, TemplateListHandler, User, UserUpdateParams,
};
use super::ChatService;
use crate::emoji::EmojiContainer;

/// One step reported to the init handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStep {
    MigrationStarted,
    Failed(ServiceError),
    Succeeded,
}

/// A recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Init(String),
    Connect(String),
    Disconnect,
    UpdateUserInfo(UserUpdateParams),
    GetAllEmoji,
    AddExtension(String),
    AddEventHandler(String),
    RemoveEventHandler(String),
    GetChannel(String),
    UpdateChannel(String),
    DeleteChannel(String),
    GetNotificationTemplates,
    GetNotificationChannelSettings,
}

struct MockState {
    init_steps: Vec<InitStep>,
    hold_init: bool,
    held_init: VecDeque<Arc<dyn InitResultHandler>>,
    connect_user: Option<User>,
    connect_error: Option<ServiceError>,
    state: ConnectionState,
    current_user: Option<User>,
    update_user_error: Option<ServiceError>,
    emoji: ServiceResult<EmojiContainer>,
    app_info: Option<AppInfo>,
    channels: HashMap<String, Channel>,
    channel_error: Option<ServiceError>,
    templates: ServiceResult<NotificationTemplateList>,
    channel_settings: ServiceResult<NotificationChannelSettings>,
    handlers: HashMap<String, Arc<dyn EventHandler>>,
    calls: Vec<MockCall>,
    deliver_async: bool,
    drop_callbacks: bool,
}

/// Mock messaging service.
///
/// Allows scripting of results, injection of errors and push events, and
/// tracking of calls.
///
/// # Example
///
/// ```ignore
/// use chatkit_core::service::{MockChatService, User};
///
/// let service = MockChatService::new();
/// service.set_connect_result(Some(User::new("alice")), None);
/// service.emit(event);
/// assert_eq!(service.calls().len(), 1);
/// ```
pub struct MockChatService {
    inner: Mutex<MockState>,
}

impl Default for MockChatService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatService {
    /// Creates a mock whose init succeeds and whose connect yields user `"user"`.
    pub fn new() -> Self {
        MockChatService {
            inner: Mutex::new(MockState {
                init_steps: vec![InitStep::Succeeded],
                hold_init: false,
                held_init: VecDeque::new(),
                connect_user: Some(User::new("user")),
                connect_error: None,
                state: ConnectionState::Closed,
                current_user: None,
                update_user_error: None,
                emoji: Err(ServiceError::new(404, "no emoji catalogue")),
                app_info: None,
                channels: HashMap::new(),
                channel_error: None,
                templates: Err(ServiceError::new(404, "no templates")),
                channel_settings: Err(ServiceError::new(404, "no channel settings")),
                handlers: HashMap::new(),
                calls: Vec::new(),
                deliver_async: false,
                drop_callbacks: false,
            }),
        }
    }

    /// Sets the steps reported to the next init handler.
    pub fn set_init_steps(&self, steps: Vec<InitStep>) {
        self.inner.lock().init_steps = steps;
    }

    /// Holds init handlers instead of completing them; see [`Self::complete_init`].
    pub fn set_hold_init(&self, hold: bool) {
        self.inner.lock().hold_init = hold;
    }

    /// Reports `steps` to the oldest held init handler.
    pub fn complete_init(&self, steps: Vec<InitStep>) -> bool {
        let handler = self.inner.lock().held_init.pop_front();
        match handler {
            Some(handler) => {
                run_init_steps(handler.as_ref(), steps);
                true
            }
            None => false,
        }
    }

    /// Sets what the next connect reports.
    pub fn set_connect_result(&self, user: Option<User>, error: Option<ServiceError>) {
        let mut inner = self.inner.lock();
        inner.connect_user = user;
        inner.connect_error = error;
    }

    /// Injects an error for profile updates.
    pub fn set_update_user_error(&self, error: Option<ServiceError>) {
        self.inner.lock().update_user_error = error;
    }

    /// Sets the emoji catalogue fetch result.
    pub fn set_emoji_result(&self, result: ServiceResult<EmojiContainer>) {
        self.inner.lock().emoji = result;
    }

    /// Sets the application metadata returned after connect.
    pub fn set_app_info(&self, info: Option<AppInfo>) {
        self.inner.lock().app_info = info;
    }

    /// Makes a channel available to `get_channel`.
    pub fn put_channel(&self, channel: Channel) {
        self.inner
            .lock()
            .channels
            .insert(channel.url.clone(), channel);
    }

    /// Injects an error for channel operations.
    pub fn set_channel_error(&self, error: Option<ServiceError>) {
        self.inner.lock().channel_error = error;
    }

    /// Sets the template list fetch result.
    pub fn set_templates_result(&self, result: ServiceResult<NotificationTemplateList>) {
        self.inner.lock().templates = result;
    }

    /// Sets the channel settings fetch result.
    pub fn set_channel_settings_result(&self, result: ServiceResult<NotificationChannelSettings>) {
        self.inner.lock().channel_settings = result;
    }

    /// Delivers callbacks on a spawned thread, like a real SDK.
    pub fn set_deliver_async(&self, enabled: bool) {
        self.inner.lock().deliver_async = enabled;
    }

    /// Drops completions without invoking them.
    pub fn set_drop_callbacks(&self, enabled: bool) {
        self.inner.lock().drop_callbacks = enabled;
    }

    /// Manually sets the connection state.
    pub fn set_state(&self, state: ConnectionState) {
        self.inner.lock().state = state;
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.inner.lock().calls.clone()
    }

    /// Counts recorded calls matching `pred`.
    pub fn count_calls(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|c| pred(c)).count()
    }

    /// Clears the recorded calls.
    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Returns the keys of registered event handlers.
    pub fn handler_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.lock().handlers.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the handler registered under `key`.
    pub fn handler(&self, key: &str) -> Option<Arc<dyn EventHandler>> {
        self.inner.lock().handlers.get(key).cloned()
    }

    /// Delivers `event` to every registered handler. Returns the number of handlers.
    pub fn emit(&self, event: ChannelEvent) -> usize {
        let handlers: Vec<Arc<dyn EventHandler>> =
            self.inner.lock().handlers.values().cloned().collect();
        for handler in &handlers {
            handler.on_event(event.clone());
        }
        handlers.len()
    }

    fn record(&self, call: MockCall) {
        self.inner.lock().calls.push(call);
    }

    fn deliver<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let (deliver_async, drop_callbacks) = {
            let inner = self.inner.lock();
            (inner.deliver_async, inner.drop_callbacks)
        };
        if drop_callbacks {
            return;
        }
        if deliver_async {
            thread::spawn(f);
        } else {
            f();
        }
    }
}

fn run_init_steps(handler: &dyn InitResultHandler, steps: Vec<InitStep>) {
    for step in steps {
        match step {
            InitStep::MigrationStarted => handler.on_migration_started(),
            InitStep::Failed(err) => handler.on_init_failed(err),
            InitStep::Succeeded => handler.on_init_succeeded(),
        }
    }
}

impl ChatService for MockChatService {
    fn init(&self, params: InitParams, handler: Arc<dyn InitResultHandler>) {
        let steps = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::Init(params.app_id));
            if inner.hold_init {
                inner.held_init.push_back(handler);
                return;
            }
            inner.init_steps.clone()
        };
        self.deliver(move || run_init_steps(handler.as_ref(), steps));
    }

    fn connect(&self, user_id: &str, _access_token: Option<&str>, handler: ConnectHandler) {
        let (user, error) = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::Connect(user_id.to_string()));
            let user = inner.connect_user.clone();
            let error = inner.connect_error.clone();
            if error.is_none() && user.is_some() {
                inner.state = ConnectionState::Open;
                inner.current_user = user.clone();
            }
            (user, error)
        };
        self.deliver(move || handler(user, error));
    }

    fn disconnect(&self, handler: DisconnectHandler) {
        {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::Disconnect);
            inner.state = ConnectionState::Closed;
            inner.current_user = None;
        }
        self.deliver(handler);
    }

    fn update_current_user_info(&self, params: UserUpdateParams, handler: CompletionHandler) {
        let error = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::UpdateUserInfo(params.clone()));
            let error = inner.update_user_error.clone();
            if error.is_none() {
                if let Some(user) = inner.current_user.as_mut() {
                    if let Some(nickname) = params.nickname {
                        user.nickname = nickname;
                    }
                    if let Some(profile_url) = params.profile_url {
                        user.profile_url = profile_url;
                    }
                }
            }
            error
        };
        self.deliver(move || handler(error));
    }

    fn get_all_emoji(&self, handler: EmojiContainerHandler) {
        let result = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::GetAllEmoji);
            inner.emoji.clone()
        };
        self.deliver(move || handler(result));
    }

    fn app_info(&self) -> Option<AppInfo> {
        self.inner.lock().app_info.clone()
    }

    fn connection_state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    fn current_user(&self) -> Option<User> {
        self.inner.lock().current_user.clone()
    }

    fn add_extension(&self, key: &str, version: &str) {
        self.record(MockCall::AddExtension(format!("{}/{}", key, version)));
    }

    fn add_event_handler(&self, key: &str, handler: Arc<dyn EventHandler>) {
        let mut inner = self.inner.lock();
        inner.calls.push(MockCall::AddEventHandler(key.to_string()));
        inner.handlers.insert(key.to_string(), handler);
    }

    fn remove_event_handler(&self, key: &str) -> Option<Arc<dyn EventHandler>> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(MockCall::RemoveEventHandler(key.to_string()));
        inner.handlers.remove(key)
    }

    fn get_channel(&self, kind: ChannelKind, url: &str, handler: ChannelHandler) {
        let result = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::GetChannel(url.to_string()));
            match inner.channel_error.clone() {
                Some(err) => Err(err),
                None => inner
                    .channels
                    .get(url)
                    .filter(|c| c.kind == kind)
                    .cloned()
                    .ok_or_else(|| ServiceError::new(400_201, format!("channel {} not found", url))),
            }
        };
        self.deliver(move || handler(result));
    }

    fn update_channel(&self, url: &str, params: ChannelUpdateParams, handler: ChannelHandler) {
        let result = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::UpdateChannel(url.to_string()));
            if let Some(err) = inner.channel_error.clone() {
                Err(err)
            } else {
                match inner.channels.get_mut(url) {
                    Some(channel) => {
                        if let Some(name) = params.name {
                            channel.name = name;
                        }
                        if let Some(cover_url) = params.cover_url {
                            channel.cover_url = cover_url;
                        }
                        if let Some(operators) = params.operators {
                            channel.operators = operators;
                        }
                        channel.updated_at += 1;
                        Ok(channel.clone())
                    }
                    None => Err(ServiceError::new(400_201, format!("channel {} not found", url))),
                }
            }
        };
        self.deliver(move || handler(result));
    }

    fn delete_channel(&self, url: &str, handler: CompletionHandler) {
        let error = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::DeleteChannel(url.to_string()));
            match inner.channel_error.clone() {
                Some(err) => Some(err),
                None => match inner.channels.remove(url) {
                    Some(_) => None,
                    None => Some(ServiceError::new(400_201, format!("channel {} not found", url))),
                },
            }
        };
        self.deliver(move || handler(error));
    }

    fn get_notification_templates(&self, handler: TemplateListHandler) {
        let result = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::GetNotificationTemplates);
            inner.templates.clone()
        };
        self.deliver(move || handler(result));
    }

    fn get_notification_channel_settings(&self, handler: ChannelSettingsHandler) {
        let result = {
            let mut inner = self.inner.lock();
            inner.calls.push(MockCall::GetNotificationChannelSettings);
            inner.channel_settings.clone()
        };
        self.deliver(move || handler(result));
    }
}

// INLINE_TEST_REQUIRED: Tests private delivery switches
#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::CallbackHandler;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_connect_opens_connection() {
        let service = MockChatService::new();
        assert_eq!(service.connection_state(), ConnectionState::Closed);

        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        service.connect(
            "user",
            None,
            Box::new(move |user, err| {
                *seen_clone.lock() = Some((user, err));
            }),
        );

        let (user, err) = seen.lock().take().unwrap();
        assert_eq!(user.unwrap().user_id, "user");
        assert!(err.is_none());
        assert_eq!(service.connection_state(), ConnectionState::Open);
    }

    #[test]
    fn test_dropped_callbacks_never_fire() {
        let service = MockChatService::new();
        service.set_drop_callbacks(true);

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        service.disconnect(Box::new(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(service.calls(), vec![MockCall::Disconnect]);
    }

    #[test]
    fn test_emit_reaches_registered_handlers() {
        let service = MockChatService::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        service.add_event_handler(
            "a",
            Arc::new(CallbackHandler::new(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })),
        );

        let delivered = service.emit(ChannelEvent::ChannelDeleted {
            channel_url: "c".into(),
            kind: ChannelKind::Open,
        });

        assert_eq!(delivered, 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
