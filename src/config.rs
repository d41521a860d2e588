use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// shared read-only with every handler through `FromRef`.
///
/// The document-store credentials are consumed only server-side and never leave the
/// process. Missing credentials do not stop the server from starting; remote calls
/// then fail authentication and surface as `500` responses from the proxy.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and secret strictness.
    pub env: Env,
    // Document store project identifier.
    pub project_id: String,
    // Server-held API key for the document store.
    pub api_key: String,
    // REST base URL of the document store.
    pub store_url: String,
    // HS256 secret used to validate session tokens.
    pub jwt_secret: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Defines the runtime context, switching between developer conveniences and
/// production strictness.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_STORE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const LOCAL_JWT_SECRET: &str = "marketplace-local-session-secret";

impl Default for AppConfig {
    /// Safe, non-panicking configuration for tests.
    fn default() -> Self {
        Self {
            env: Env::Local,
            project_id: "marketplace-test".to_string(),
            api_key: "test-api-key".to_string(),
            store_url: "http://localhost:8080".to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every parameter from the environment.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `SESSION_JWT_SECRET` is unset. The local
    /// fallback secret is only honoured in `Env::Local`.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => env::var("SESSION_JWT_SECRET")
                .expect("FATAL: SESSION_JWT_SECRET must be set in production."),
            Env::Local => {
                env::var("SESSION_JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string())
            }
        };

        Self {
            env,
            project_id: env::var("FIREBASE_PROJECT_ID").unwrap_or_default(),
            api_key: env::var("FIREBASE_API_KEY").unwrap_or_default(),
            store_url: env::var("DOCUMENT_STORE_URL")
                .unwrap_or_else(|_| DEFAULT_STORE_URL.to_string()),
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }

    /// Names of the document-store settings that are missing.
    ///
    /// Checked after logging is initialised so `main` can warn about them; an
    /// incomplete store configuration is not a startup failure.
    pub fn missing_store_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.project_id.trim().is_empty() {
            missing.push("FIREBASE_PROJECT_ID");
        }
        if self.api_key.trim().is_empty() {
            missing.push("FIREBASE_API_KEY");
        }
        missing
    }
}
