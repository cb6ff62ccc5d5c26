//! In-memory collaborators shared by the service and route tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;

use crate::db::UserProfile;
use crate::error::{AppError, AppResult};
use crate::services::google_auth::ServiceAccountKey;
use crate::services::notifications::{OutboundNotification, PushSender};
use crate::services::profiles::ProfileStore;

pub const TEST_SERVICE_ACCOUNT_JSON: &str =
    include_str!("../../tests/fixtures/service_account.json");
pub const TEST_PUBLIC_KEY_PEM: &str = include_str!("../../tests/fixtures/service_account.pub.pem");

pub fn test_service_account_key() -> ServiceAccountKey {
    ServiceAccountKey::from_json(TEST_SERVICE_ACCOUNT_JSON).unwrap()
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Profile documents keyed by user id, recording every read.
#[derive(Default)]
pub struct InMemoryProfileStore {
    docs: Mutex<HashMap<String, Value>>,
    failing: Mutex<HashSet<String>>,
    reads: Mutex<Vec<String>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: &str, doc: Value) {
        self.docs.lock().unwrap().insert(user_id.to_string(), doc);
    }

    /// Make reads of `user_id` fail as if the store were unreachable.
    pub fn fail_for(&self, user_id: &str) {
        self.failing.lock().unwrap().insert(user_id.to_string());
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_user_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        self.reads.lock().unwrap().push(user_id.to_string());

        if self.failing.lock().unwrap().contains(user_id) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "profile store unavailable"
            )));
        }

        let docs = self.docs.lock().unwrap();
        Ok(docs.get(user_id).map(|doc| {
            UserProfile::from_document(user_id, doc.as_object().unwrap())
        }))
    }
}

/// Records every send attempt; either succeeds with a sequential message id
/// or fails with a fixed error.
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundNotification>>,
    failure: Option<String>,
}

impl RecordingSender {
    pub fn succeeding() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(error.to_string()),
        }
    }

    /// Notifications that were handed to the sender, including failed ones.
    pub fn attempted(&self) -> Vec<OutboundNotification> {
        self.sent.lock().unwrap().clone()
    }

    /// Notifications that were accepted.
    pub fn sent(&self) -> Vec<OutboundNotification> {
        if self.failure.is_some() {
            return Vec::new();
        }
        self.attempted()
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl PushSender for RecordingSender {
    async fn send(&self, notification: &OutboundNotification) -> AppResult<String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(notification.clone());
        match &self.failure {
            Some(error) => Err(AppError::Push(error.clone())),
            None => Ok(format!("projects/test/messages/{}", sent.len())),
        }
    }
}
