//! Host-supplied session identity and profile reconciliation.

use crate::service::{User, UserUpdateParams};

/// Credentials and desired profile of the local user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionIdentity {
    pub user_id: String,
    pub access_token: Option<String>,
    /// Desired nickname. Empty means "keep the server's".
    pub nickname: String,
    /// Desired profile image URL. Empty means "keep the server's".
    pub profile_url: String,
}

impl SessionIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        SessionIdentity {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = url.into();
        self
    }
}

/// Supplies the identity to connect with.
///
/// Consulted on every `connect`, so hosts may switch users between sessions.
pub trait SessionAdapter: Send + Sync {
    fn identity(&self) -> SessionIdentity;
}

impl SessionAdapter for SessionIdentity {
    fn identity(&self) -> SessionIdentity {
        self.clone()
    }
}

/// Computes the profile update to push after connecting, if any.
///
/// Nickname: supplied, else the server's, else the user id when
/// `use_user_id_for_nickname` is set. Profile URL: supplied, else the
/// server's. An update is needed when the nickname differs, or the profile
/// URL is non-empty and differs.
pub fn profile_update(
    identity: &SessionIdentity,
    server: &User,
    use_user_id_for_nickname: bool,
) -> Option<UserUpdateParams> {
    let mut nickname = if identity.nickname.is_empty() {
        server.nickname.clone()
    } else {
        identity.nickname.clone()
    };
    if nickname.is_empty() && use_user_id_for_nickname {
        nickname = identity.user_id.clone();
    }

    let profile_url = if identity.profile_url.is_empty() {
        server.profile_url.clone()
    } else {
        identity.profile_url.clone()
    };

    let nickname_changed = nickname != server.nickname;
    let profile_changed = !profile_url.is_empty() && profile_url != server.profile_url;
    if !nickname_changed && !profile_changed {
        return None;
    }

    Some(UserUpdateParams {
        nickname: Some(nickname),
        profile_url: (!profile_url.is_empty()).then_some(profile_url),
    })
}
