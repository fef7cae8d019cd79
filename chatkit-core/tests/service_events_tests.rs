//! Tests for service::events and the mock service
//!
//! Event routing helpers, handler registration and scripted results.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chatkit_core::service::*;
use parking_lot::Mutex;

fn channel(url: &str) -> Channel {
    Channel::new(url, ChannelKind::Group)
}

#[test]
fn test_channel_url_for_every_variant() {
    let user = User::new("bob");
    let events = vec![
        ChannelEvent::ChannelChanged { channel: channel("c") },
        ChannelEvent::UserEntered {
            channel: channel("c"),
            user: user.clone(),
        },
        ChannelEvent::UserExited {
            channel: channel("c"),
            user: user.clone(),
        },
        ChannelEvent::UserJoined {
            channel: channel("c"),
            user: user.clone(),
        },
        ChannelEvent::UserLeft {
            channel: channel("c"),
            user: user.clone(),
        },
        ChannelEvent::OperatorUpdated { channel: channel("c") },
        ChannelEvent::UserBanned {
            channel: channel("c"),
            user,
        },
        ChannelEvent::ChannelFrozen { channel: channel("c") },
        ChannelEvent::ChannelUnfrozen { channel: channel("c") },
        ChannelEvent::ChannelDeleted {
            channel_url: "c".into(),
            kind: ChannelKind::Group,
        },
    ];

    for event in events {
        assert_eq!(event.channel_url(), "c", "{:?}", event);
    }
}

#[test]
fn test_callback_handler() {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = count.clone();

    let handler = CallbackHandler::new(move |_event| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    handler.on_event(ChannelEvent::ChannelChanged {
        channel: channel("c"),
    });

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handler_replaced_under_same_key() {
    let service = MockChatService::new();
    let count = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let count_clone = count.clone();
        service.add_event_handler(
            "screen",
            Arc::new(CallbackHandler::new(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })),
        );
    }

    assert_eq!(service.handler_keys(), vec!["screen".to_string()]);
    service.emit(ChannelEvent::ChannelChanged {
        channel: channel("c"),
    });
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_removed_handler_receives_nothing() {
    let service = MockChatService::new();
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = count.clone();
    service.add_event_handler(
        "screen",
        Arc::new(CallbackHandler::new(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        })),
    );

    assert!(service.remove_event_handler("screen").is_some());
    assert!(service.remove_event_handler("screen").is_none());
    assert_eq!(
        service.emit(ChannelEvent::ChannelChanged {
            channel: channel("c"),
        }),
        0
    );
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_init_steps_reported_in_order() {
    #[derive(Default)]
    struct Recorder(Mutex<Vec<&'static str>>);

    impl InitResultHandler for Recorder {
        fn on_migration_started(&self) {
            self.0.lock().push("migration");
        }
        fn on_init_succeeded(&self) {
            self.0.lock().push("succeeded");
        }
    }

    let service = MockChatService::new();
    service.set_init_steps(vec![InitStep::MigrationStarted, InitStep::Succeeded]);
    let recorder = Arc::new(Recorder::default());

    service.init(
        InitParams {
            app_id: "app".into(),
            use_caching: true,
        },
        recorder.clone(),
    );

    assert_eq!(*recorder.0.lock(), vec!["migration", "succeeded"]);
    assert_eq!(service.calls(), vec![MockCall::Init("app".into())]);
}

#[test]
fn test_update_channel_applies_params() {
    let service = MockChatService::new();
    service.put_channel(channel("c"));

    let seen = Arc::new(Mutex::new(None));
    let seen_clone = seen.clone();
    service.update_channel(
        "c",
        ChannelUpdateParams {
            name: Some("Renamed".into()),
            operators: Some(vec!["alice".into()]),
            ..Default::default()
        },
        Box::new(move |result| {
            *seen_clone.lock() = Some(result);
        }),
    );

    let updated = seen.lock().take().unwrap().unwrap();
    assert_eq!(updated.name, "Renamed");
    assert!(updated.is_operator("alice"));
    assert_eq!(updated.updated_at, 1);
}
