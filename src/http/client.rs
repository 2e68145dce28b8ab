use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{
    envelope,
    error::{ApiError, ApiResult},
    session::SessionHandle,
};
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Anonymous,
    Bearer,
}

/// Thin wrapper over `reqwest::Client` that knows the backend base URL and
/// where to find the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: SessionHandle) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("tunehub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base = config.api_base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { http, base, session })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Url> {
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Decode(format!("bad endpoint {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        auth: Auth,
    ) -> ApiResult<(Option<T>, Option<String>)> {
        let request = self.request(Method::GET, url, auth)?;
        Self::envelope(request).await
    }

    pub async fn send<B, T>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        auth: Auth,
    ) -> ApiResult<(Option<T>, Option<String>)>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.request(method, url, auth)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::envelope(request).await
    }

    /// Plain text endpoint: success is the transport status alone.
    pub async fn text(&self, url: Url) -> ApiResult<String> {
        let response = self.request(Method::GET, url, Auth::Anonymous)?.send().await?;
        let response = Self::require_success(response)?;
        Ok(response.text().await?)
    }

    /// Downloads a body, following redirects.
    pub async fn bytes(&self, url: Url) -> ApiResult<Vec<u8>> {
        let response = self.request(Method::GET, url, Auth::Anonymous)?.send().await?;
        let response = Self::require_success(response)?;
        Ok(response.bytes().await?.to_vec())
    }

    fn request(&self, method: Method, url: Url, auth: Auth) -> ApiResult<RequestBuilder> {
        debug!("{method} {}", url.path());
        let request = self.http.request(method, url);
        match auth {
            Auth::Anonymous => Ok(request),
            Auth::Bearer => {
                let token = self.session.token().ok_or(ApiError::NotLoggedIn)?;
                Ok(request.bearer_auth(token))
            }
        }
    }

    async fn envelope<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> ApiResult<(Option<T>, Option<String>)> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        envelope::decode(status, &body)
    }

    fn require_success(response: Response) -> ApiResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::Api {
                status: response.status().as_u16(),
                code: None,
                message: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = AppConfig::for_base(Url::parse(base).unwrap());
        ApiClient::new(&config, SessionHandle::in_memory()).unwrap()
    }

    #[test]
    fn endpoints_keep_the_base_path() {
        let api = client("https://music.example.org/tunehub");
        let url = api
            .endpoint("/api/", &[("type", "search"), ("keyword", "a b&c")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://music.example.org/tunehub/api/?type=search&keyword=a+b%26c"
        );
    }

    #[test]
    fn bearer_requests_need_a_session() {
        let api = client("http://localhost:8000");
        let url = api.endpoint("auth/me", &[]).unwrap();
        assert!(matches!(
            api.request(Method::GET, url, Auth::Bearer),
            Err(ApiError::NotLoggedIn)
        ));
    }
}
