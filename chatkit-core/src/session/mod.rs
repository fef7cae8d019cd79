//! Session lifecycle
//!
//! [`ChatKit`] owns init, connect and disconnect. After every successful
//! connect it runs best-effort reconciliation stages: profile sync, emoji
//! catalogue refresh and notification settings sync.

mod connector;
mod identity;
mod stage;

pub use connector::{
    ChatKit, ChatKitBuilder, ConnectOutcome, EXTENSION_KEY, EXTENSION_VERSION,
};
pub use identity::{profile_update, SessionAdapter, SessionIdentity};
