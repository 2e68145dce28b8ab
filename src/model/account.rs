use serde::{Deserialize, Serialize};

/// Payload of `/auth/login`, `/auth/register` and `/auth/me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing)]
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginLog {
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub time: String,
}

/// Wrapper the server uses for every list payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPayload<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}
