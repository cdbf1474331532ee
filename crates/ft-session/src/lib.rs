//! Wallet session abstraction.
//!
//! Key custody and signing live in an external wallet; this crate only models
//! the session it hands back and the operations it exposes.

use async_trait::async_trait;
use ft_api_types::{PermissionLevel, TransactResult, Transaction};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub actor: String,
    pub permission: String,
    pub chain_id: String,
}

impl Session {
    pub fn new(actor: &str, permission: &str, chain_id: &str) -> Result<Self, SessionError> {
        if actor.trim().is_empty() || permission.trim().is_empty() {
            return Err(SessionError::adapter(
                "wallet returned a session without actor or permission",
                None,
            ));
        }

        Ok(Self {
            actor: actor.trim().to_owned(),
            permission: permission.trim().to_owned(),
            chain_id: chain_id.to_owned(),
        })
    }

    pub fn permission_level(&self) -> PermissionLevel {
        PermissionLevel {
            actor: self.actor.clone(),
            permission: self.permission.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no wallet connected")]
    NotConnected,
    #[error("wallet request cancelled")]
    Cancelled,
    #[error("{}", adapter_reason(.message, .cause))]
    Adapter {
        message: String,
        cause: Option<String>,
    },
}

fn adapter_reason<'a>(message: &'a str, cause: &'a Option<String>) -> &'a str {
    cause.as_deref().unwrap_or(message)
}

impl SessionError {
    pub fn adapter(message: &str, cause: Option<String>) -> Self {
        Self::Adapter {
            message: message.to_owned(),
            cause: cause.filter(|c| !c.trim().is_empty()),
        }
    }

    /// A rejected login. The user closing the wallet prompt (an `AbortError`
    /// or a message mentioning "cancel") is `Cancelled`; anything else is an
    /// adapter error. Rejections of other operations always go through
    /// [`SessionError::adapter`].
    pub fn login_rejected(name: Option<&str>, message: &str, cause: Option<String>) -> Self {
        if name == Some("AbortError") || message.to_ascii_lowercase().contains("cancel") {
            return Self::Cancelled;
        }
        Self::adapter(message, cause)
    }

    /// Human-readable reason, preferring the wrapped cause over the outer message.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Login, logout, restore and signing, as provided by the wallet plugin.
#[async_trait(?Send)]
pub trait SessionKit {
    async fn login(&self) -> Result<Session, SessionError>;
    async fn logout(&self, session: &Session) -> Result<(), SessionError>;
    async fn restore(&self) -> Result<Option<Session>, SessionError>;
    async fn transact(
        &self,
        session: &Session,
        transaction: &Transaction,
    ) -> Result<TransactResult, SessionError>;
}

/// Holds at most one live session.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: RefCell<Option<Session>>,
}

impl SessionSlot {
    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn actor(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.actor.clone())
    }

    pub fn is_active(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Install `session`, returning the one it displaced.
    pub fn replace(&self, session: Session) -> Option<Session> {
        self.current.borrow_mut().replace(session)
    }

    pub fn take(&self) -> Option<Session> {
        self.current.borrow_mut().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_requires_actor_and_permission() {
        assert!(Session::new("", "active", "chain").is_err());
        assert!(Session::new("alice", " ", "chain").is_err());

        let session = Session::new(" alice ", "active", "chain").unwrap();
        assert_eq!(
            session.permission_level(),
            PermissionLevel {
                actor: "alice".to_owned(),
                permission: "active".to_owned(),
            }
        );
    }

    #[test]
    fn reason_prefers_cause() {
        let err = SessionError::adapter(
            "Transaction failed",
            Some("assertion failure with message: overdrawn balance".to_owned()),
        );
        assert_eq!(err.reason(), "assertion failure with message: overdrawn balance");

        let err = SessionError::adapter("Transaction failed", Some("  ".to_owned()));
        assert_eq!(err.reason(), "Transaction failed");
    }

    #[test]
    fn only_login_rejections_read_as_cancelled() {
        assert_eq!(
            SessionError::login_rejected(None, "User cancelled login", None),
            SessionError::Cancelled
        );
        assert_eq!(
            SessionError::login_rejected(Some("AbortError"), "The user aborted a request.", None),
            SessionError::Cancelled
        );

        let err = SessionError::login_rejected(None, "Login failed", Some("no wallet".to_owned()));
        assert_eq!(err.reason(), "no wallet");

        let err = SessionError::adapter(
            "Transaction failed",
            Some("assertion failure with message: order already cancelled".to_owned()),
        );
        assert_ne!(err, SessionError::Cancelled);
        assert_eq!(err.reason(), "assertion failure with message: order already cancelled");
    }

    #[test]
    fn slot_holds_a_single_session() {
        let slot = SessionSlot::default();
        assert!(!slot.is_active());

        let first = Session::new("alice", "active", "chain").unwrap();
        let second = Session::new("bob", "owner", "chain").unwrap();
        assert!(slot.replace(first.clone()).is_none());
        assert_eq!(slot.replace(second), Some(first));
        assert_eq!(slot.actor().as_deref(), Some("bob"));

        assert!(slot.take().is_some());
        assert!(slot.current().is_none());
    }
}
