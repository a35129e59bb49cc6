//! Authentication endpoints

use serde_json::Value;

use crate::api::client::{ApiClient, ApiRequest};
use crate::auth::{Credentials, LoginGrant, TokenResponse, UserProfile};
use crate::error::Result;

impl ApiClient {
    /// Exchange credentials for a token; sent as a multipart form
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginGrant> {
        let request = ApiRequest::post("/auth/token")
            .form([("username", username), ("password", password)]);
        let response: TokenResponse = self.send(request).await?;
        Ok(response.into())
    }

    pub async fn current_user(&self) -> Result<UserProfile> {
        self.send(ApiRequest::get("/auth/user/me")).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.send(ApiRequest::post("/auth/logout")).await
    }

    /// Every account on the platform; admin only
    pub async fn all_users(&self) -> Result<Vec<UserProfile>> {
        self.send(ApiRequest::get("/auth/user")).await
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Value> {
        let request = ApiRequest::post("/register").json(&Credentials::new(username, password))?;
        self.send(request).await
    }

    /// Log in, store the session, then fetch and store the profile
    ///
    /// When the server omits `expires_in` the configured default lifetime
    /// applies, so a session never becomes unbounded.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<UserProfile> {
        let grant = self.login(username, password).await?;
        let expires_in = grant.expires_in.unwrap_or_else(|| {
            tracing::debug!(
                default = self.default_expires_in_secs,
                "Token endpoint sent no expires_in"
            );
            self.default_expires_in_secs
        });
        self.session
            .set_session(grant.token, grant.token_type, expires_in)
            .await;

        let profile = self.current_user().await?;
        self.session.set_user(profile.clone()).await;
        tracing::info!(user = %profile.username, "Signed in");
        Ok(profile)
    }

    /// Tell the server, then drop the local session whatever it answered
    pub async fn sign_out(&self) {
        if let Err(e) = self.logout().await {
            tracing::debug!("Logout call failed: {}", e);
        }
        self.session.clear_session().await;
        self.session.clear_user().await;
        tracing::info!("Signed out");
    }
}
