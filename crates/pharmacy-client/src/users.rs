//! Account and user administration endpoints.

use pharmacy_core::{User, UserInfo};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use crate::client::{ApiClient, MessageResponse};
use crate::error::ClientResult;

/// Body of `PUT /api/users/profile`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    /// Omitted when the password is left unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

/// Body of `PUT /api/users/{id}` (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub is_admin: bool,
}

impl ApiClient {
    /// `POST /api/users/signin`
    #[instrument(skip(self, password))]
    pub async fn signin(&self, email: &str, password: &str) -> ClientResult<UserInfo> {
        let request = self
            .public(Method::POST, "/api/users/signin")?
            .json(&serde_json::json!({ "email": email, "password": password }));
        self.send_json(request).await
    }

    /// `POST /api/users/signup`
    #[instrument(skip(self, password))]
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ClientResult<UserInfo> {
        let request = self.public(Method::POST, "/api/users/signup")?.json(
            &serde_json::json!({ "name": name, "email": email, "password": password }),
        );
        self.send_json(request).await
    }

    /// `PUT /api/users/profile`. Returns the refreshed session.
    #[instrument(skip(self, update), fields(email = update.email))]
    pub async fn update_profile(&self, update: &ProfileUpdate<'_>) -> ClientResult<UserInfo> {
        let request = self.authed(Method::PUT, "/api/users/profile")?.json(update);
        self.send_json(request).await
    }

    /// `GET /api/users` (admin)
    #[instrument(skip(self))]
    pub async fn users(&self) -> ClientResult<Vec<User>> {
        let request = self.authed(Method::GET, "/api/users")?;
        self.send_json(request).await
    }

    /// `GET /api/users/{id}` (admin)
    #[instrument(skip(self))]
    pub async fn user(&self, id: &str) -> ClientResult<User> {
        let request = self.authed(Method::GET, &format!("/api/users/{id}"))?;
        self.send_json(request).await
    }

    /// `PUT /api/users/{id}` (admin)
    #[instrument(skip(self, update))]
    pub async fn update_user(
        &self,
        id: &str,
        update: &UserUpdate<'_>,
    ) -> ClientResult<MessageResponse> {
        let request = self
            .authed(Method::PUT, &format!("/api/users/{id}"))?
            .json(update);
        self.send_json(request).await
    }

    /// `DELETE /api/users/{id}` (admin)
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> ClientResult<MessageResponse> {
        let request = self.authed(Method::DELETE, &format!("/api/users/{id}"))?;
        self.send_json(request).await
    }

    /// `POST /api/users/forget-password`
    #[instrument(skip(self))]
    pub async fn forget_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let request = self
            .public(Method::POST, "/api/users/forget-password")?
            .json(&serde_json::json!({ "email": email }));
        self.send_json(request).await
    }

    /// `POST /api/users/reset-password` with the token from the reset email.
    #[instrument(skip(self, password, reset_token))]
    pub async fn reset_password(
        &self,
        password: &str,
        reset_token: &str,
    ) -> ClientResult<MessageResponse> {
        let request = self
            .public(Method::POST, "/api/users/reset-password")?
            .json(&serde_json::json!({ "password": password, "token": reset_token }));
        self.send_json(request).await
    }
}
