//! `reqwest`-backed implementation of [`ClubApi`].

use super::{ClubApi, OrderExportQuery, OrderQuery, ProblemQuery, WorkQuery};
use crate::{
    errors::{Error, Result, ValidationError},
    models::{
        Boat, BoatType, Credentials, NewOrder, NewProblem, NewWork, Order, OrderUpdate, Problem,
        ProblemUpdate, Season, SeasonReport, Shift, ShiftReport, TokenResponse, User,
        UserSummary, Work, WorkUpdate,
    },
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::RwLock;
use tracing::{debug, instrument, warn};

/// Error body returned by the backend (`{"detail": ...}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ErrorBody {
    fn into_message(self) -> String {
        match self.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

/// A 401 from the login endpoint means a wrong password, not an expired session.
fn login_error(error: Error) -> Error {
    match error {
        Error::Unauthenticated => ValidationError::InvalidCredentials.into(),
        other => other,
    }
}

/// HTTP client for the lniworks backend.
#[derive(Debug)]
pub struct HttpClubApi {
    client: Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
}

impl HttpClubApi {
    /// Builds a client rooted at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("lniworks-buddy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            bearer: RwLock::new(None),
        })
    }

    /// Root URL requests are built from.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Option<String> {
        self.bearer.read().ok().and_then(|guard| guard.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!("{method} {url}");
        let req = self.client.request(method, url);
        match self.bearer() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(req: RequestBuilder) -> Result<Response> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend answered 401 Unauthorized");
            return Err(Error::Unauthenticated);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
            |_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            },
            ErrorBody::into_message,
        );
        warn!("Backend answered {status}: {message}");
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = Self::send(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    async fn get_json_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync + ?Sized,
    {
        let response = Self::send(self.request(Method::GET, path).query(query)).await?;
        Ok(response.json().await?)
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let response = Self::send(self.request(method, path).json(body)).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        Self::send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn get_bytes<Q>(&self, path: &str, query: Option<&Q>) -> Result<Vec<u8>>
    where
        Q: Serialize + Sync + ?Sized,
    {
        let mut req = self.request(Method::GET, path);
        if let Some(query) = query {
            req = req.query(query);
        }
        let response = Self::send(req).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ClubApi for HttpClubApi {
    fn set_bearer(&self, token: Option<String>) {
        if let Ok(mut guard) = self.bearer.write() {
            *guard = token;
        }
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.send_json(Method::POST, "/api/auth/login", credentials)
            .await
            .map_err(login_error)
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn register(&self, credentials: &Credentials) -> Result<User> {
        self.send_json(Method::POST, "/api/auth/register", credentials)
            .await
    }

    async fn profile(&self) -> Result<User> {
        self.get_json("/api/auth/profile").await
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        self.get_json("/api/auth/users").await
    }

    async fn list_seasons(&self) -> Result<Vec<Season>> {
        self.get_json("/api/seasons/").await
    }

    #[instrument(skip(self))]
    async fn list_shifts(&self, season_id: i64) -> Result<Vec<Shift>> {
        self.get_json(&format!("/api/shifts/season/{season_id}"))
            .await
    }

    async fn list_boats(&self, boat_type: Option<BoatType>) -> Result<Vec<Boat>> {
        match boat_type {
            Some(t) => {
                self.get_json_with("/api/boats/", &[("boat_type", t.as_str())])
                    .await
            }
            None => self.get_json("/api/boats/").await,
        }
    }

    async fn boat_parts(&self, boat_type: BoatType) -> Result<Vec<String>> {
        self.get_json(&format!("/api/boats/type/{}/parts", boat_type.as_str()))
            .await
    }

    #[instrument(skip(self))]
    async fn list_problems(&self, query: &ProblemQuery) -> Result<Vec<Problem>> {
        self.get_json_with("/api/problems/", query).await
    }

    async fn get_problem(&self, id: i64) -> Result<Problem> {
        self.get_json(&format!("/api/problems/{id}")).await
    }

    #[instrument(skip(self, problem), fields(shift_id = problem.shift_id))]
    async fn create_problem(&self, problem: &NewProblem) -> Result<Problem> {
        self.send_json(Method::POST, "/api/problems/", problem)
            .await
    }

    #[instrument(skip(self, update))]
    async fn update_problem(&self, id: i64, update: &ProblemUpdate) -> Result<Problem> {
        self.send_json(Method::PUT, &format!("/api/problems/{id}"), update)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_problem(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/problems/{id}")).await
    }

    #[instrument(skip(self))]
    async fn list_works(&self, query: &WorkQuery) -> Result<Vec<Work>> {
        self.get_json_with("/api/works/", query).await
    }

    async fn get_work(&self, id: i64) -> Result<Work> {
        self.get_json(&format!("/api/works/{id}")).await
    }

    #[instrument(skip(self, work), fields(shift_id = work.shift_id))]
    async fn create_work(&self, work: &NewWork) -> Result<Work> {
        self.send_json(Method::POST, "/api/works/", work).await
    }

    #[instrument(skip(self, update))]
    async fn update_work(&self, id: i64, update: &WorkUpdate) -> Result<Work> {
        self.send_json(Method::PUT, &format!("/api/works/{id}"), update)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_work(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/works/{id}")).await
    }

    #[instrument(skip(self))]
    async fn export_works(&self, query: &WorkQuery) -> Result<Vec<u8>> {
        self.get_bytes("/api/works/export", Some(query)).await
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<Order>> {
        self.get_json_with("/api/orders/", query).await
    }

    async fn get_order(&self, id: i64) -> Result<Order> {
        self.get_json(&format!("/api/orders/{id}")).await
    }

    #[instrument(skip(self, order), fields(shift_id = order.shift_id))]
    async fn create_order(&self, order: &NewOrder) -> Result<Order> {
        self.send_json(Method::POST, "/api/orders/", order).await
    }

    #[instrument(skip(self, update))]
    async fn update_order(&self, id: i64, update: &OrderUpdate) -> Result<Order> {
        self.send_json(Method::PUT, &format!("/api/orders/{id}"), update)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/orders/{id}")).await
    }

    #[instrument(skip(self))]
    async fn export_orders(&self, query: &OrderExportQuery) -> Result<Vec<u8>> {
        self.get_bytes("/api/orders/export", Some(query)).await
    }

    #[instrument(skip(self))]
    async fn season_report(&self, season_id: i64) -> Result<SeasonReport> {
        self.get_json(&format!("/api/reports/season/{season_id}"))
            .await
    }

    #[instrument(skip(self))]
    async fn shift_report(&self, shift_id: i64) -> Result<ShiftReport> {
        self.get_json(&format!("/api/reports/shift/{shift_id}"))
            .await
    }

    #[instrument(skip(self))]
    async fn export_season(&self, season_id: i64) -> Result<Vec<u8>> {
        self.get_bytes::<()>(
            &format!("/api/reports/season/{season_id}/export-excel"),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serves one request with a canned JSON answer and returns the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            // Read the whole request before answering
            let mut buf = vec![0u8; 16 * 1024];
            let mut read = 0;
            loop {
                let Ok(n) = socket.read(&mut buf[read..]).await else {
                    return;
                };
                if n == 0 {
                    break;
                }
                read += n;
                let text = String::from_utf8_lossy(&buf[..read]);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            if name.eq_ignore_ascii_case("content-length") {
                                value.trim().parse::<usize>().ok()
                            } else {
                                None
                            }
                        })
                        .unwrap_or(0);
                    if read >= head_end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        Ok(format!("http://{addr}"))
    }

    #[tokio::test]
    async fn test_wrong_password_is_a_credentials_error() -> Result<()> {
        let url = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"detail":"Invalid credentials"}"#,
        )
        .await?;
        let api = HttpClubApi::new(url)?;

        let result = api
            .login(&Credentials {
                username: "mario".to_string(),
                password: "sbagliata".to_string(),
            })
            .await;

        let err = result.err();
        assert!(matches!(
            err,
            Some(Error::Validation(ValidationError::InvalidCredentials))
        ));
        assert_eq!(
            err.map(|e| e.user_message()).as_deref(),
            Some("Username o password non corretti")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthenticated() -> Result<()> {
        let url = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"detail":"Could not validate credentials"}"#,
        )
        .await?;
        let api = HttpClubApi::new(url)?;
        api.set_bearer(Some("scaduto".to_string()));

        assert!(matches!(api.profile().await, Err(Error::Unauthenticated)));
        Ok(())
    }

    #[test]
    fn test_login_error_keeps_other_failures() {
        let err = login_error(Error::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(matches!(err, Error::Api { status: 500, .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() -> Result<()> {
        let api = HttpClubApi::new("http://localhost:8000/")?;
        assert_eq!(api.base_url(), "http://localhost:8000");
        Ok(())
    }

    #[test]
    fn test_bearer_can_be_set_and_cleared() -> Result<()> {
        let api = HttpClubApi::new("http://localhost:8000")?;
        assert_eq!(api.bearer(), None);
        api.set_bearer(Some("abc".to_string()));
        assert_eq!(api.bearer().as_deref(), Some("abc"));
        api.set_bearer(None);
        assert_eq!(api.bearer(), None);
        Ok(())
    }

    #[test]
    fn test_error_body_message() -> std::result::Result<(), serde_json::Error> {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Season not found"}"#)?;
        assert_eq!(body.into_message(), "Season not found");

        let body: ErrorBody = serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#)?;
        assert!(body.into_message().contains("field required"));
        Ok(())
    }
}
