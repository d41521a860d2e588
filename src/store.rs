use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// StoreError
///
/// Failures talking to the remote document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("document store returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// The request never produced a response (DNS, connect, TLS, timeout...).
    #[error("{0}")]
    Transport(String),
}

// 1. DocumentStore Contract
/// DocumentStore
///
/// Abstract contract for the remote document database. Handlers only see this
/// trait, so tests swap the HTTP client for `MockDocumentStore`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Deletes `collection/id`. Exactly one remote call, no retries.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// StoreState
///
/// The concrete type used to share the store client across the application state.
pub type StoreState = Arc<dyn DocumentStore>;

// 2. The Real Implementation (Firestore REST API)
/// FirestoreStore
///
/// Talks to the Firestore REST endpoint using the server-held API key. The key is
/// appended as the `key` query parameter and never forwarded to browsers.
#[derive(Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: String,
}

/// Error envelope returned by Google REST APIs.
#[derive(Deserialize)]
struct RemoteErrorBody {
    error: RemoteErrorDetail,
}

#[derive(Deserialize)]
struct RemoteErrorDetail {
    #[serde(default)]
    message: String,
}

impl FirestoreStore {
    pub fn new(base_url: &str, project_id: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// REST URL of a single document, without the credential.
    pub fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}/{}",
            self.base_url,
            urlencoding::encode(&self.project_id),
            urlencoding::encode(collection),
            urlencoding::encode(id),
        )
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        tracing::debug!(%url, "deleting remote document");

        let response = self
            .client
            .delete(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // The body is best-effort; a non-JSON error page still yields a Remote error.
        let message = response
            .json::<RemoteErrorBody>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_default();

        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

// 3. The Mock Implementation (For Tests)
/// MockOutcome
///
/// What `MockDocumentStore` answers with.
#[derive(Clone, Debug, PartialEq)]
pub enum MockOutcome {
    /// Deletes succeed once per id; repeats answer `404`.
    Succeed,
    /// Every call answers with this remote status.
    RemoteFailure(u16),
    /// Every call fails before reaching the store.
    TransportFailure(String),
    /// Every call panics with this message.
    Panic(String),
}

/// MockDocumentStore
///
/// In-memory `DocumentStore` that counts calls, so tests can assert that
/// rejected requests never reach the remote store.
pub struct MockDocumentStore {
    outcome: MockOutcome,
    calls: AtomicUsize,
    deleted: Mutex<HashSet<String>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::with_outcome(MockOutcome::Succeed)
    }

    pub fn new_failing() -> Self {
        Self::with_outcome(MockOutcome::RemoteFailure(503))
    }

    pub fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            deleted: Mutex::new(HashSet::new()),
        }
    }

    /// Number of remote calls attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            MockOutcome::Succeed => {
                let key = format!("{collection}/{id}");
                let first_delete = self
                    .deleted
                    .lock()
                    .map_err(|_| StoreError::Transport("mock store poisoned".to_string()))?
                    .insert(key);
                if first_delete {
                    Ok(())
                } else {
                    Err(StoreError::Remote {
                        status: 404,
                        message: "document not found".to_string(),
                    })
                }
            }
            MockOutcome::RemoteFailure(status) => Err(StoreError::Remote {
                status: *status,
                message: "Mock Store Error: Simulation requested".to_string(),
            }),
            MockOutcome::TransportFailure(message) => Err(StoreError::Transport(message.clone())),
            MockOutcome::Panic(message) => panic!("{}", message),
        }
    }
}
