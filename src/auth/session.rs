//! Client session storage contract.
//!
//! Four keys (`memberId`, `accessToken`, `refreshToken`, `role`) plus a
//! logged-in flag, written and cleared as one group. A missing flag means
//! "logged out" no matter what the other slots hold.

use serde::Serialize;
use tokio::sync::RwLock;

use crate::backend::LoginData;

#[derive(Debug, Default)]
struct SessionSlots {
    member_id: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    role: Option<String>,
    logged_in: bool,
}

/// Public view of the stored session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub member_id: String,
    pub role: String,
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct SessionStore {
    slots: RwLock<SessionSlots>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a successful login as one atomic group write.
    pub async fn store_login(&self, data: &LoginData) {
        let mut slots = self.slots.write().await;
        slots.member_id = Some(data.member_id.to_string());
        slots.access_token = Some(data.access_token.clone());
        slots.refresh_token = Some(data.refresh_token.clone());
        slots.role = Some(data.role.clone());
        slots.logged_in = true;
    }

    /// Clear the whole group on logout.
    pub async fn clear(&self) {
        let mut slots = self.slots.write().await;
        *slots = SessionSlots::default();
    }

    pub async fn is_logged_in(&self) -> bool {
        self.slots.read().await.logged_in
    }

    /// The stored identity, if (and only if) the logged-in flag is set.
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let slots = self.slots.read().await;
        if !slots.logged_in {
            return None;
        }
        Some(SessionSnapshot {
            member_id: slots.member_id.clone().unwrap_or_default(),
            role: slots.role.clone().unwrap_or_default(),
        })
    }

    /// Bearer token for authorized calls, present only while logged in.
    pub async fn access_token(&self) -> Option<String> {
        let slots = self.slots.read().await;
        if !slots.logged_in {
            return None;
        }
        slots.access_token.clone()
    }
}
