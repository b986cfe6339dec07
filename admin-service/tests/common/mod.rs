//! Test harness for admin-service integration tests.
//!
//! Spawns the real router on a random local port with temp-file stores and a
//! recording mailer, mirroring how the service runs next to the gateway.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use admin_service::{
    build_router,
    config::{AdminConfig, Environment, SmtpConfig},
    models::Invitation,
    services::{Argon2Hasher, HashProvider, InviteService, MockMailer, UserService},
    store::{CredentialStore, InviteStore},
    AppState,
};
use service_core::observability::LogFormat;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Group header value the tests present as an administrator.
pub const ADMIN_GROUPS: &str = "admins,users";

pub struct TestApp {
    pub address: String,
    pub state: AppState,
    pub users_file: PathBuf,
    pub invites_file: PathBuf,
    pub mailer: Arc<MockMailer>,
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> anyhow::Result<TestApp> {
        let data_dir = tempfile::tempdir()?;
        let users_file = data_dir.path().join("users.json");
        let invites_file = data_dir.path().join("invites.json");

        let config = test_config(&users_file, &invites_file);

        let credentials = Arc::new(CredentialStore::new(&users_file));
        let invite_store = Arc::new(InviteStore::new(&invites_file));
        let hasher: Arc<dyn HashProvider> = Arc::new(Argon2Hasher::new(Duration::from_secs(30)));
        let mailer = Arc::new(MockMailer::default());

        let users = UserService::new(credentials.clone(), hasher.clone());
        let invites = InviteService::new(
            invite_store,
            credentials,
            hasher,
            mailer.clone(),
            config.public_url.clone(),
            config.invite_ttl_minutes,
        );

        let state = AppState {
            config,
            users,
            invites,
        };
        let router = build_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server crashed");
        });

        Ok(TestApp {
            address: format!("http://127.0.0.1:{}", port),
            state,
            users_file,
            invites_file,
            mailer,
            _data_dir: data_dir,
        })
    }

    /// Client without any forwarded identity - the public view.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }

    /// Client the proxy would produce for a signed-in administrator.
    pub fn admin_client(&self) -> reqwest::Client {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Remote-Groups",
            reqwest::header::HeaderValue::from_static(ADMIN_GROUPS),
        );
        headers.insert(
            "Remote-User",
            reqwest::header::HeaderValue::from_static("root"),
        );
        reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build admin client")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Raw credential store document, as the gateway would read it.
    pub fn read_users_doc(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.users_file).expect("users file missing");
        serde_json::from_str(&raw).expect("users file is not valid JSON")
    }

    /// Raw invite store document.
    pub fn read_invites_doc(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.invites_file).expect("invites file missing");
        serde_json::from_str(&raw).expect("invites file is not valid JSON")
    }

    /// Plant an invitation directly in the store, bypassing the API.
    pub fn seed_invite(&self, token: &str, invitation: Invitation) {
        let mut invites = std::collections::BTreeMap::new();
        invites.insert(token.to_string(), invitation);
        let bytes = serde_json::to_vec_pretty(&invites).expect("failed to serialize invitation");
        std::fs::write(&self.invites_file, bytes).expect("failed to write invite store");
    }
}

fn test_config(users_file: &PathBuf, invites_file: &PathBuf) -> AdminConfig {
    AdminConfig {
        common: service_core::config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        environment: Environment::Dev,
        service_name: "admin-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "warn".to_string(),
        log_format: LogFormat::Plain,
        users_file: users_file.clone(),
        invites_file: invites_file.clone(),
        public_url: "http://auth.example.test".to_string(),
        admin_group: "admins".to_string(),
        invite_ttl_minutes: 60,
        hash_timeout_seconds: 30,
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 25,
            tls: false,
            username: None,
            password: None,
            from: "admin@example.test".to_string(),
        },
    }
}
