//! User account endpoints

use serde::Serialize;
use serde_json::Value;

use crate::api::client::{ApiClient, ApiRequest};
use crate::auth::{Credentials, UserProfile};
use crate::error::Result;

impl ApiClient {
    /// JSON credential login; returns the server's confirmation as is
    pub async fn user_login(&self, credentials: &Credentials) -> Result<Value> {
        self.send(ApiRequest::post("/auth/login").json(credentials)?)
            .await
    }

    pub async fn user_info(&self) -> Result<UserProfile> {
        self.send(ApiRequest::get("/user/info")).await
    }

    pub async fn update_user_info<T: Serialize + ?Sized>(&self, fields: &T) -> Result<Value> {
        self.send(ApiRequest::post("/user/update").json(fields)?)
            .await
    }
}
