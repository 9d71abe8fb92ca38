//! Reqwest adapter implementing the hook layer's API ports.
//!
//! Non-success responses carry the server's error envelope; its message is
//! passed through so the UI can show it verbatim.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{LoginBody, SetBody, SignupBody};
use crate::client::{AccountApi, ClientError, SetsApi};
use crate::domain::{
    AuthenticatedSession, Error as ApiError, LoginCredentials, SessionToken, SetDraft, SetId,
    SignupForm, SpeciesSet, User,
};
use crate::outbound::http_support::{directory_url, status_message};

const USER_AGENT: &str = concat!("taxa/", env!("CARGO_PKG_VERSION"));

/// Client for the REST API rooted at `base`, for example
/// `http://127.0.0.1:8080/`.
#[derive(Clone)]
pub struct RestApiClient {
    client: Client,
    base: Url,
}

impl RestApiClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base: directory_url(base),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base
            .join(path)
            .map_err(|error| ClientError::transport(format!("bad endpoint {path}: {error}")))?;
        Ok(self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    fn authorised(
        &self,
        method: Method,
        path: &str,
        token: &SessionToken,
    ) -> Result<RequestBuilder, ClientError> {
        Ok(self.request(method, path)?.bearer_auth(token.as_str()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), ClientError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%status, bytes = body.len(), "api response received");
        Ok((status, body.to_vec()))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        serde_json::from_slice(&body)
            .map_err(|error| ClientError::transport(format!("invalid API payload: {error}")))
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountApi for RestApiClient {
    async fn sign_up(&self, form: &SignupForm) -> Result<User, ClientError> {
        let request = self
            .request(Method::POST, "api/users")?
            .json(&SignupBody::from(form));
        self.send_json(request).await
    }

    async fn log_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedSession, ClientError> {
        let request = self
            .request(Method::POST, "api/login")?
            .json(&LoginBody::from(credentials));
        self.send_json(request).await
    }
}

#[async_trait]
impl SetsApi for RestApiClient {
    async fn list(&self, token: &SessionToken) -> Result<Vec<SpeciesSet>, ClientError> {
        let request = self.authorised(Method::GET, "api/sets", token)?;
        self.send_json(request).await
    }

    async fn get(&self, token: &SessionToken, id: &SetId) -> Result<SpeciesSet, ClientError> {
        let request = self.authorised(Method::GET, &format!("api/sets/{id}"), token)?;
        self.send_json(request).await
    }

    async fn create(
        &self,
        token: &SessionToken,
        draft: &SetDraft,
    ) -> Result<SpeciesSet, ClientError> {
        let request = self
            .authorised(Method::POST, "api/sets", token)?
            .json(&SetBody::from(draft));
        self.send_json(request).await
    }

    async fn update(
        &self,
        token: &SessionToken,
        id: &SetId,
        draft: &SetDraft,
    ) -> Result<SpeciesSet, ClientError> {
        let request = self
            .authorised(Method::PUT, &format!("api/sets/{id}"), token)?
            .json(&SetBody::from(draft));
        self.send_json(request).await
    }

    async fn delete(&self, token: &SessionToken, id: &SetId) -> Result<(), ClientError> {
        let request = self.authorised(Method::DELETE, &format!("api/sets/{id}"), token)?;
        self.send_empty(request).await
    }
}

fn map_transport_error(error: reqwest::Error) -> ClientError {
    ClientError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ApiError>(body)
        .map(|envelope| envelope.message().to_owned())
        .unwrap_or_else(|_| status_message(status.as_u16(), body));
    match status {
        StatusCode::BAD_REQUEST => ClientError::validation(message),
        StatusCode::UNAUTHORIZED => ClientError::auth(message),
        StatusCode::FORBIDDEN => ClientError::forbidden(message),
        StatusCode::NOT_FOUND => ClientError::not_found(message),
        StatusCode::CONFLICT => ClientError::conflict(message),
        _ => {
            warn!(%status, %message, "api request failed");
            ClientError::transport(message)
        }
    }
}
