use reqwest::Method;
use serde::Serialize;
use tracing::{info, warn};

use super::{
    client::{ApiClient, Auth},
    error::{ApiError, ApiResult},
    session::Session,
};
use crate::model::{AuthUser, ListPayload, LoginLog, Profile};

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    password: &'a str,
}

/// Contents of the password form before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordForm {
    pub fn validate(&self) -> ApiResult<()> {
        if self.current.is_empty() || self.new.is_empty() {
            return Err(ApiError::Validation("Please fill in every field"));
        }
        if self.new != self.confirm {
            return Err(ApiError::Validation("The new passwords do not match"));
        }
        Ok(())
    }
}

/// Result of revalidating a stored session at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restore {
    NoSession,
    Valid(String),
    Rejected,
    /// The server could not be reached; the stored session is kept as is.
    Unreachable,
}

#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn current_user(&self) -> Option<String> {
        self.api.session().username()
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::Validation("Username and password are required"));
        }

        let url = self.api.endpoint("auth/login", &[])?;
        let (user, message) = self
            .api
            .send::<_, AuthUser>(
                Method::POST,
                url,
                Some(&Credentials { username, password }),
                Auth::Anonymous,
            )
            .await?;

        let user = user.ok_or_else(|| ApiError::Decode("login answered without data".into()))?;
        let token = user
            .token
            .ok_or_else(|| ApiError::Decode("login answered without a token".into()))?;
        let username = if user.username.is_empty() {
            username.to_string()
        } else {
            user.username
        };

        info!("Logged in as {username}");
        self.api.session().establish(Session {
            token,
            username: username.clone(),
        });

        Ok(message.unwrap_or_else(|| "Logged in".to_string()))
    }

    /// Registers and then signs in. The backend answers registration without a
    /// token, so a follow-up login establishes the session.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<String> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::Validation("Username and password are required"));
        }

        let url = self.api.endpoint("auth/register", &[])?;
        let (user, message) = self
            .api
            .send::<_, AuthUser>(
                Method::POST,
                url,
                Some(&Credentials { username, password }),
                Auth::Anonymous,
            )
            .await?;

        match user {
            Some(AuthUser {
                username: registered,
                token: Some(token),
            }) => {
                let username = if registered.is_empty() {
                    username.to_string()
                } else {
                    registered
                };
                self.api.session().establish(Session { token, username });
                Ok(message.unwrap_or_else(|| "Registered".to_string()))
            }
            _ => {
                info!("Registered {username}, signing in");
                self.login(username, password).await
            }
        }
    }

    pub async fn restore(&self) -> Restore {
        if !self.api.session().is_logged_in() {
            return Restore::NoSession;
        }

        let result = match self.api.endpoint("auth/me", &[]) {
            Ok(url) => self.api.get::<AuthUser>(url, Auth::Bearer).await,
            Err(e) => Err(e),
        };

        match result {
            Ok((Some(user), _)) if !user.username.is_empty() => {
                self.api.session().rename(&user.username);
                Restore::Valid(user.username)
            }
            Err(ApiError::Transport(e)) => {
                warn!("Could not revalidate session: {e}");
                Restore::Unreachable
            }
            other => {
                if let Err(e) = other {
                    info!("Stored session rejected: {e}");
                }
                self.api.session().destroy();
                Restore::Rejected
            }
        }
    }

    /// Tells the server to drop the token when there is one; the local
    /// session is destroyed whatever the server answers.
    pub async fn logout(&self) {
        if self.api.session().is_logged_in() {
            let result = match self.api.endpoint("auth/logout", &[]) {
                Ok(url) => {
                    self.api
                        .send::<(), serde_json::Value>(Method::POST, url, None, Auth::Bearer)
                        .await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!("Logout request failed: {e}");
            }
        }
        self.api.session().destroy();
        info!("Logged out");
    }

    pub async fn change_password(&self, form: &PasswordForm) -> ApiResult<String> {
        form.validate()?;
        if !self.api.session().is_logged_in() {
            return Err(ApiError::NotLoggedIn);
        }

        let url = self.api.endpoint("auth/password", &[])?;
        let (_, message) = self
            .api
            .send::<_, serde_json::Value>(
                Method::POST,
                url,
                Some(&PasswordChange {
                    current_password: &form.current,
                    new_password: &form.new,
                }),
                Auth::Bearer,
            )
            .await?;
        Ok(message.unwrap_or_else(|| "Password updated".to_string()))
    }

    /// Deletes the account and, on success, logs out.
    pub async fn delete_account(&self, password: &str) -> ApiResult<String> {
        if !self.api.session().is_logged_in() {
            return Err(ApiError::NotLoggedIn);
        }
        if password.is_empty() {
            return Err(ApiError::Validation("Please enter your password"));
        }

        let url = self.api.endpoint("auth/delete", &[])?;
        let (_, message) = self
            .api
            .send::<_, serde_json::Value>(
                Method::POST,
                url,
                Some(&DeleteRequest { password }),
                Auth::Bearer,
            )
            .await?;

        self.logout().await;
        Ok(message.unwrap_or_else(|| "Account deleted".to_string()))
    }

    pub async fn profile(&self) -> ApiResult<Profile> {
        let url = self.api.endpoint("profile", &[])?;
        let (profile, _) = self.api.get::<Profile>(url, Auth::Bearer).await?;
        Ok(profile.unwrap_or_default())
    }

    pub async fn update_profile(&self, profile: &Profile) -> ApiResult<String> {
        let url = self.api.endpoint("profile", &[])?;
        let (_, message) = self
            .api
            .send::<_, serde_json::Value>(Method::PUT, url, Some(profile), Auth::Bearer)
            .await?;
        Ok(message.unwrap_or_else(|| "Saved".to_string()))
    }

    pub async fn login_logs(&self) -> ApiResult<Vec<LoginLog>> {
        let url = self.api.endpoint("login-logs", &[])?;
        let (payload, _) = self
            .api
            .get::<ListPayload<LoginLog>>(url, Auth::Bearer)
            .await?;
        Ok(payload.map(|p| p.list).unwrap_or_default())
    }
}
