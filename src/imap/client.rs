// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use async_imap::Client as AsyncImapClient;
use rustls::pki_types::ServerName as PkiServerName;
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream as TokioTcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_rustls::{client::TlsStream as TokioTlsStreamClient, TlsConnector};
use tokio_util::compat::TokioAsyncReadCompatExt;

use crate::imap::error::ImapError;
use crate::imap::session::{AsyncImapSessionWrapper, ImapSession, TlsImapSession};
use crate::imap::types::{HeaderBlock, MailboxInfo, SearchCriteria};

// --- Type Aliases ---

type BaseTcpStream = TokioTcpStream;
type BaseTlsStream = TokioTlsStreamClient<BaseTcpStream>;

const LOGIN_TIMEOUT: Duration = Duration::from_secs(30);

/// High-level asynchronous IMAP client providing a simplified interface.
///
/// This client handles the connection, TLS setup, login, and delegates
/// operations to an underlying `ImapSession`.
pub struct ImapClient {
    session: Arc<Mutex<dyn ImapSession>>,
}

// --- Internal Connection Logic ---

/// Establishes TCP connection, performs TLS handshake, and configures the stream.
async fn setup_tls_stream(
    host: &str,
    port: u16,
    tls_connector: TlsConnector,
    server_name_for_tls: PkiServerName<'static>,
) -> Result<BaseTlsStream, ImapError> {
    log::debug!("Attempting TCP connection to {}:{}...", host, port);
    let tcp_stream = BaseTcpStream::connect((host, port)).await?;
    log::debug!("TCP connected. Performing TLS handshake...");

    let tls_stream = tls_connector
        .connect(server_name_for_tls, tcp_stream)
        .await
        .map_err(|e| ImapError::Tls(e.to_string()))?;
    log::debug!("TLS handshake successful.");
    Ok(tls_stream)
}

/// Internal helper to connect, setup TLS, and login, returning the raw session.
async fn connect_and_login_internal(
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    timeout_duration: Duration,
) -> Result<TlsImapSession, ImapError> {
    // --- Server Name Setup ---
    let host_owned = host.to_string();
    let server_name_static: PkiServerName<'static> = PkiServerName::try_from(host_owned)
        .map_err(|_| ImapError::Connection(format!("Invalid server name format: {}", host)))?;

    // --- TLS Configuration ---
    let mut root_cert_store = RootCertStore::empty();
    let certs = rustls_native_certs::load_native_certs()?;
    let (added, ignored) = root_cert_store.add_parsable_certificates(certs);
    log::debug!("Loaded {} native certs, ignored {}.", added, ignored);
    if root_cert_store.is_empty() {
        log::warn!("Root certificate store is empty after loading native certs.");
    }

    let config = ClientConfig::builder()
        .with_root_certificates(root_cert_store)
        .with_no_client_auth();
    let tls_connector = TlsConnector::from(Arc::new(config));

    // --- Connect, TLS Handshake ---
    let tls_stream = setup_tls_stream(host, port, tls_connector, server_name_static).await?;

    // --- Login ---
    let compat_stream = tls_stream.compat();
    let client = AsyncImapClient::new(compat_stream);
    log::debug!("IMAP client created. Attempting login for user '{}'...", username);

    match timeout(timeout_duration, client.login(username, password)).await {
        Ok(Ok(session)) => {
            log::info!("IMAP login successful for user: {}", username);
            Ok(session)
        }
        Ok(Err((e, _client))) => {
            log::error!("IMAP login failed for user {}: {:?}", username, e);
            Err(ImapError::Auth(e.to_string()))
        }
        Err(_elapsed) => {
            log::error!(
                "IMAP login timed out for user {} after {:?}",
                username,
                timeout_duration
            );
            Err(ImapError::Timeout("Login timed out".to_string()))
        }
    }
}

// --- Public ImapClient Implementation ---

impl ImapClient {
    /// Establishes a connection to the IMAP server, logs in, and returns a new `ImapClient`.
    ///
    /// This is the primary way to create an `ImapClient`.
    pub async fn connect(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Self, ImapError> {
        log::info!("Connecting to {}:{} as '{}'", host, port, username);

        let underlying_session =
            connect_and_login_internal(host, port, username, password, LOGIN_TIMEOUT).await?;

        // Wrap the raw session with our domain-specific trait implementation
        let wrapped_session = AsyncImapSessionWrapper::new(underlying_session);
        let session_arc_mutex: Arc<Mutex<dyn ImapSession>> = Arc::new(Mutex::new(wrapped_session));

        Ok(Self {
            session: session_arc_mutex,
        })
    }

    /// Creates a new `ImapClient` instance directly from a pre-existing session trait object.
    /// Useful for testing or scenarios where the session is managed externally.
    pub fn new_with_session(session: Arc<Mutex<dyn ImapSession>>) -> Self {
        Self { session }
    }

    // --- Delegated IMAP Operations ---

    pub async fn select_mailbox(&self, name: &str) -> Result<MailboxInfo, ImapError> {
        self.session.lock().await.select(name).await
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<u32>, ImapError> {
        self.session.lock().await.uid_search(criteria).await
    }

    pub async fn fetch_header_fields(
        &self,
        uids: &[u32],
    ) -> Result<Vec<HeaderBlock>, ImapError> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }
        let uid_set = join_uid_set(uids);
        self.session
            .lock()
            .await
            .fetch_header_fields(&uid_set)
            .await
    }

    /// Marks the given messages \Deleted. Does not expunge.
    pub async fn mark_deleted(&self, uids: &[u32]) -> Result<(), ImapError> {
        if uids.is_empty() {
            return Ok(());
        }
        let uid_set = join_uid_set(uids);
        self.session.lock().await.add_deleted_flag(&uid_set).await
    }

    /// Expunges emails marked for deletion in the currently selected folder.
    pub async fn expunge(&self) -> Result<(), ImapError> {
        self.session.lock().await.expunge().await
    }

    /// Logs out from the IMAP server.
    /// Note: This consumes the client to prevent further operations after logout.
    pub async fn logout(self) -> Result<(), ImapError> {
        self.session.lock().await.logout().await
    }
}

fn join_uid_set(uids: &[u32]) -> String {
    uids.iter()
        .map(|uid| uid.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
