//! Session state shared by every view
//!
//! The active account is process-wide state: initialised when the wallet
//! reports accounts and updated on wallet events. It lives in one
//! [`SessionContext`] passed to whoever needs it, changes only through
//! [`SessionContext::set_active_account`], and dependents subscribe to
//! changes instead of re-reading storage.

use std::fmt;
use tracing::debug;
use willchain_core::Address;

/// Handle returned by [`SessionContext::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change notification delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The active account changed (`None` means disconnected)
    AccountChanged {
        previous: Option<Address>,
        current: Option<Address>,
    },
}

type Listener = Box<dyn FnMut(&SessionEvent) + Send>;

/// Holder of the active account
#[derive(Default)]
pub struct SessionContext {
    active_account: Option<Address>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl SessionContext {
    /// Create a session with no active account
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session already bound to an account
    pub fn with_account(account: impl Into<Address>) -> Self {
        Self {
            active_account: Some(account.into()),
            ..Self::default()
        }
    }

    /// The active account, if a wallet is connected
    pub fn active_account(&self) -> Option<&Address> {
        self.active_account.as_ref()
    }

    /// Check if an account is active
    pub fn is_connected(&self) -> bool {
        self.active_account.is_some()
    }

    /// Replace the active account and notify subscribers
    ///
    /// Blank addresses count as a disconnect. Setting the account it already
    /// holds (ignoring checksum casing) is a no-op. Returns whether anything
    /// changed.
    pub fn set_active_account(&mut self, account: Option<Address>) -> bool {
        let account = account.filter(|a| !a.is_empty());
        let unchanged = match (&self.active_account, &account) {
            (Some(current), Some(next)) => current.matches(next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return false;
        }

        let previous = std::mem::replace(&mut self.active_account, account);
        debug!(
            previous = ?previous.as_ref().map(Address::as_str),
            current = ?self.active_account.as_ref().map(Address::as_str),
            "active account changed"
        );
        let event = SessionEvent::AccountChanged {
            previous,
            current: self.active_account.clone(),
        };
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        true
    }

    /// Drop the active account
    pub fn disconnect(&mut self) -> bool {
        self.set_active_account(None)
    }

    /// Register a listener for session changes
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SessionEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("active_account", &self.active_account)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(session: &mut SessionContext) -> (SubscriptionId, Arc<Mutex<Vec<SessionEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = session.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        (id, seen)
    }

    #[test]
    fn test_set_active_account_notifies() {
        let mut session = SessionContext::new();
        let (_, seen) = recorder(&mut session);

        assert!(session.set_active_account(Some(Address::from("0xAAA"))));
        assert_eq!(session.active_account(), Some(&Address::from("0xAAA")));
        assert!(session.is_connected());

        let events = seen.lock().unwrap();
        assert_eq!(
            *events,
            vec![SessionEvent::AccountChanged {
                previous: None,
                current: Some(Address::from("0xAAA")),
            }]
        );
    }

    #[test]
    fn test_same_account_is_noop() {
        let mut session = SessionContext::with_account("0xAbC");
        let (_, seen) = recorder(&mut session);

        assert!(!session.set_active_account(Some(Address::from("0xabc"))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_blank_account_disconnects() {
        let mut session = SessionContext::with_account("0xAAA");
        let (_, seen) = recorder(&mut session);

        assert!(session.set_active_account(Some(Address::from(""))));
        assert!(!session.is_connected());
        assert!(!session.disconnect());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut session = SessionContext::new();
        let (id, seen) = recorder(&mut session);

        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.set_active_account(Some(Address::from("0xAAA")));
        assert!(seen.lock().unwrap().is_empty());
    }
}
