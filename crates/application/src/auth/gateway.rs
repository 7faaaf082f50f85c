//! Sign-in, registration and identity refresh.
//!
//! The gateway turns backend token grants into stored sessions. Both
//! sign-in and registration are sent anonymously: whatever credential
//! might still be cached has no business on those requests, and a
//! rejected password must never tear down an existing session.

use std::sync::Arc;

use agora_domain::{Registration, TokenGrant, UserProfile};

use crate::error::{ApiError, SessionError};
use crate::ports::{ApiRequest, ApiTransport};
use crate::session::{SessionManager, WriteTicket};

/// Authentication operations against the backend.
pub struct AuthGateway {
    transport: Arc<dyn ApiTransport>,
    sessions: Arc<SessionManager>,
}

impl AuthGateway {
    /// Creates the gateway over a transport and the session store.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>, sessions: Arc<SessionManager>) -> Self {
        Self {
            transport,
            sessions,
        }
    }

    /// Creates an account and signs it in.
    ///
    /// The backend validates the payload authoritatively; call
    /// [`Registration::validate`] first to catch rule violations
    /// without a round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the backend rejects the
    /// payload, for example a taken username, and any transport or
    /// persistence failure.
    pub async fn register(&self, registration: &Registration) -> Result<TokenGrant, ApiError> {
        let ticket = self.sessions.begin_write();
        let request = ApiRequest::post("/api/auth/register")
            .anonymous()
            .with_json(registration)?;
        let response = self.transport.execute(request).await?;
        let grant: TokenGrant = response.json()?;
        self.commit(ticket, &grant).await?;
        tracing::info!(username = %grant.user.username, "account registered");
        Ok(grant)
    }

    /// Signs in with a username and password.
    ///
    /// Credentials travel as an URL-encoded form, the shape the
    /// backend's token endpoint expects. On success the session store
    /// holds the new session; on failure it is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for a wrong username or
    /// password, and any transport or persistence failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenGrant, ApiError> {
        let ticket = self.sessions.begin_write();
        let form = vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let request = ApiRequest::post("/api/auth/login")
            .anonymous()
            .with_form(form);
        let response = self.transport.execute(request).await?;
        let grant: TokenGrant = response.json()?;
        self.commit(ticket, &grant).await?;
        tracing::info!(username = %grant.user.username, "signed in");
        Ok(grant)
    }

    /// Fetches the profile of the signed-in user and refreshes the
    /// stored identity with it.
    ///
    /// The credential is never replaced by this call. A session change
    /// while the request is in flight discards the response instead of
    /// overwriting the newer state.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when no valid credential was
    /// attached, and any transport or persistence failure.
    pub async fn fetch_current_user(&self) -> Result<UserProfile, ApiError> {
        let credential = self.sessions.current_credential();
        let response = self
            .transport
            .execute(ApiRequest::get("/api/auth/me"))
            .await?;
        let identity: UserProfile = response.json()?;
        if let Some(credential) = credential {
            let applied = self
                .sessions
                .refresh_identity(&credential, identity.clone())
                .await?;
            if !applied {
                tracing::debug!("identity refresh discarded after a session change");
            }
        }
        Ok(identity)
    }

    /// Signs out locally.
    ///
    /// The backend holds no session state, so no request is sent; the
    /// stored session is removed and observers are told.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] when the stored entries could
    /// not be removed.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.sessions.clear().await
    }

    async fn commit(&self, ticket: WriteTicket, grant: &TokenGrant) -> Result<(), ApiError> {
        let session = grant
            .session()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let applied = self.sessions.save(ticket, session).await?;
        if !applied {
            tracing::debug!("sign-in response superseded; session left alone");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use agora_domain::{Credential, Role, Session, UserProfile};

    use crate::ports::{
        ApiResponse, HttpMethod, RequestBody, SessionStorage, StorageError, StoredEntries,
    };

    use super::*;

    #[derive(Default)]
    struct MemoryStorage {
        entries: StdMutex<StoredEntries>,
    }

    #[async_trait]
    impl SessionStorage for MemoryStorage {
        async fn read(&self) -> Result<StoredEntries, StorageError> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn write(&self, credential: &str, identity_json: &str) -> Result<(), StorageError> {
            *self.entries.lock().unwrap() = StoredEntries {
                credential: Some(credential.to_string()),
                identity_json: Some(identity_json.to_string()),
            };
            Ok(())
        }

        async fn clear(&self) -> Result<(), StorageError> {
            *self.entries.lock().unwrap() = StoredEntries::default();
            Ok(())
        }
    }

    /// Replays canned responses and records every request it sees.
    struct ScriptedTransport {
        responses: StdMutex<Vec<Result<ApiResponse, ApiError>>>,
        requests: StdMutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn replying(responses: Vec<Result<ApiResponse, ApiError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: StdMutex::new(responses),
                requests: StdMutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiTransport for ScriptedTransport {
        async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            let mut responses = self.responses.lock().unwrap();
            assert!(!responses.is_empty(), "unexpected request");
            responses.remove(0)
        }
    }

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            user_id: 4,
            username: username.to_string(),
            email: format!("{username}@example.edu"),
            display_name: None,
            role: Role::Buyer,
            created_at: Utc::now(),
        }
    }

    fn grant_body(token: &str, username: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "access_token": token,
            "token_type": "bearer",
            "user": profile(username),
        }))
        .unwrap()
    }

    fn ok(body: Vec<u8>) -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse { status: 200, body })
    }

    fn manager() -> Arc<SessionManager> {
        Arc::new(SessionManager::new(Arc::new(MemoryStorage::default())))
    }

    #[tokio::test]
    async fn login_sends_an_anonymous_form_and_saves_the_session() {
        let transport = ScriptedTransport::replying(vec![ok(grant_body("tok-1", "ana"))]);
        let sessions = manager();
        let gateway = AuthGateway::new(transport.clone(), sessions.clone());

        let grant = gateway.login("ana", "pa55word!").await.unwrap();

        assert_eq!(grant.access_token, "tok-1");
        assert_eq!(sessions.current_credential().unwrap().as_str(), "tok-1");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].path, "/api/auth/login");
        assert!(requests[0].anonymous);
        assert_eq!(
            requests[0].body,
            RequestBody::Form(vec![
                ("username".to_string(), "ana".to_string()),
                ("password".to_string(), "pa55word!".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn failed_login_leaves_the_session_untouched() {
        let transport = ScriptedTransport::replying(vec![
            ok(grant_body("tok-1", "ana")),
            Err(ApiError::Unauthorized("incorrect password".to_string())),
        ]);
        let sessions = manager();
        let gateway = AuthGateway::new(transport, sessions.clone());

        gateway.login("ana", "right").await.unwrap();
        let error = gateway.login("ana", "wrong").await.unwrap_err();

        assert!(error.is_unauthorized());
        assert_eq!(sessions.current_credential().unwrap().as_str(), "tok-1");
        assert_eq!(sessions.current_identity().unwrap().username, "ana");
    }

    #[tokio::test]
    async fn register_posts_json_and_signs_in() {
        let transport = ScriptedTransport::replying(vec![ok(grant_body("tok-7", "nuno"))]);
        let sessions = manager();
        let gateway = AuthGateway::new(transport.clone(), sessions.clone());

        let registration = Registration::new("nuno", "nuno@example.edu", "longenough")
            .with_role(Role::Seller);
        gateway.register(&registration).await.unwrap();

        assert!(sessions.is_authenticated());
        let requests = transport.requests();
        assert_eq!(requests[0].path, "/api/auth/register");
        assert!(requests[0].anonymous);
        match &requests[0].body {
            RequestBody::Json(value) => {
                assert_eq!(value["username"], "nuno");
                assert_eq!(value["role"], "seller");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn identity_refresh_keeps_the_credential() {
        let sessions = manager();
        let ticket = sessions.begin_write();
        sessions
            .save(
                ticket,
                Session::new(Credential::new("tok-1").unwrap(), profile("ana")),
            )
            .await
            .unwrap();

        let mut updated = profile("ana");
        updated.display_name = Some("Ana Prieto".to_string());
        let transport =
            ScriptedTransport::replying(vec![ok(serde_json::to_vec(&updated).unwrap())]);
        let gateway = AuthGateway::new(transport.clone(), sessions.clone());

        let fetched = gateway.fetch_current_user().await.unwrap();

        assert_eq!(fetched.display_name.as_deref(), Some("Ana Prieto"));
        assert_eq!(sessions.current_credential().unwrap().as_str(), "tok-1");
        assert_eq!(
            sessions.current_identity().unwrap().display_name.as_deref(),
            Some("Ana Prieto")
        );
        assert_eq!(transport.requests()[0].path, "/api/auth/me");
        assert!(!transport.requests()[0].anonymous);
    }

    #[tokio::test]
    async fn logout_touches_no_transport() {
        let transport = ScriptedTransport::replying(vec![ok(grant_body("tok-1", "ana"))]);
        let sessions = manager();
        let gateway = AuthGateway::new(transport.clone(), sessions.clone());

        gateway.login("ana", "pa55word!").await.unwrap();
        gateway.logout().await.unwrap();

        assert!(!sessions.is_authenticated());
        assert_eq!(transport.requests().len(), 1, "logout must stay local");
    }

    #[tokio::test]
    async fn grant_with_an_empty_token_is_a_decode_error() {
        let transport = ScriptedTransport::replying(vec![ok(grant_body("", "ana"))]);
        let sessions = manager();
        let gateway = AuthGateway::new(transport, sessions.clone());

        let error = gateway.login("ana", "pa55word!").await.unwrap_err();

        assert!(matches!(error, ApiError::Decode(_)));
        assert!(!sessions.is_authenticated());
    }
}
