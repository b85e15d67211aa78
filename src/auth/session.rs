use std::sync::{Arc, RwLock};

use crate::auth::User;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Signed-in state shared between the backend client and whoever drives it.
///
/// Cloning is cheap and every clone sees the same session.
#[derive(Clone, Debug, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.set_token(Some(token.into()));
        session
    }

    pub fn token(&self) -> Option<String> {
        match self.state.read() {
            Ok(state) => state.token.clone(),
            Err(poisoned) => poisoned.into_inner().token.clone(),
        }
    }

    pub fn user(&self) -> Option<User> {
        match self.state.read() {
            Ok(state) => state.user.clone(),
            Err(poisoned) => poisoned.into_inner().user.clone(),
        }
    }

    pub fn set_token(&self, token: Option<String>) {
        self.update(|state| state.token = token);
    }

    pub fn sign_in(&self, user: User, token: String) {
        self.update(|state| {
            state.user = Some(user);
            state.token = Some(token);
        });
    }

    pub fn sign_out(&self) {
        self.update(|state| *state = SessionState::default());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn update<F: FnOnce(&mut SessionState)>(&self, f: F) {
        match self.state.write() {
            Ok(mut state) => f(&mut state),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

#[test]
fn clones_share_sign_in_state() {
    use crate::auth::Role;

    let session = Session::anonymous();
    let shared = session.clone();
    assert!(!shared.is_authenticated());

    let user = User {
        id: "u-1".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        phone: None,
        role: Role::Customer,
        created_at: None,
        updated_at: None,
    };
    session.sign_in(user, "tok".into());

    assert_eq!(shared.token().as_deref(), Some("tok"));
    assert_eq!(shared.user().map(|u| u.id), Some("u-1".into()));

    shared.sign_out();
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}
