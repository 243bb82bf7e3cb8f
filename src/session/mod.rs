use tokio::sync::watch;

/// Opaque bearer credential. The client carries it, it never inspects it.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log the credential itself.
        f.write_str("AuthToken(..)")
    }
}

/// Holds the current session token and broadcasts changes to subscribers.
///
/// The presence of a token is what "logged in" means for this subsystem.
/// Consumers receive login/logout transitions through
/// [`SessionStore::subscribe`] instead of re-reading ambient storage.
#[derive(Clone)]
pub struct SessionStore {
    tx: watch::Sender<Option<AuthToken>>,
}

impl SessionStore {
    pub fn new(initial: Option<AuthToken>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Current token, if a session is active.
    pub fn token(&self) -> Option<AuthToken> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    #[tracing::instrument(skip(self, token))]
    pub fn login(&self, token: AuthToken) {
        tracing::info!("session started");
        self.tx.send_replace(Some(token));
    }

    #[tracing::instrument(skip(self))]
    pub fn logout(&self) {
        tracing::info!("session ended");
        self.tx.send_replace(None);
    }

    /// Watch login/logout transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthToken>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_and_logout_update_token() {
        let store = SessionStore::new(None);
        assert!(!store.is_authenticated());

        store.login(AuthToken::new("abc"));
        assert_eq!(store.token().unwrap().as_str(), "abc");

        store.logout();
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let store = SessionStore::new(None);
        let mut rx = store.subscribe();

        store.login(AuthToken::new("abc"));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        store.logout();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = AuthToken::new("super-secret");
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("super-secret"));
    }
}
