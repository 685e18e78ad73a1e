// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Clerk Backend API client for teacher accounts.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::{IdentityError, IdentityUser, NewIdentityUser, SCHOOL_METADATA_KEY};

pub const DEFAULT_CLERK_API_URL: &str = "https://api.clerk.com";

/// Page size for `GET /v1/users`. Clerk caps this at 500.
const LIST_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct ClerkClient {
    base_url: Url,
    secret_key: String,
    http: Client,
}

impl ClerkClient {
    /// Build a client for `api_url` authenticating with `secret_key`.
    pub fn new(api_url: &str, secret_key: &str) -> Result<Self, IdentityError> {
        if secret_key.trim().is_empty() {
            return Err(IdentityError::MissingConfig("CLERK_SECRET_KEY".to_string()));
        }

        let base_url = normalize_base_url(api_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| IdentityError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            secret_key: secret_key.trim().to_string(),
            http,
        })
    }

    pub async fn get_user(&self, user_id: &str) -> Result<IdentityUser, IdentityError> {
        let request = self.request(Method::GET, &["v1", "users", user_id])?;
        match self.send(request).await {
            Err(IdentityError::Rejected { status: 404, .. }) => {
                Err(IdentityError::NotFound(user_id.to_string()))
            }
            other => parse_json(other?).await,
        }
    }

    /// All users, paging through `GET /v1/users` until a short page.
    pub async fn list_users(&self) -> Result<Vec<IdentityUser>, IdentityError> {
        let mut users = Vec::new();
        let mut offset = 0;
        loop {
            let request = self.request(Method::GET, &["v1", "users"])?.query(&[
                ("limit", LIST_PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
                ("order_by", "-created_at".to_string()),
            ]);
            let page: Vec<IdentityUser> = parse_json(self.send(request).await?).await?;
            let page_len = page.len();
            users.extend(page);

            if page_len < LIST_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }
        debug!(count = users.len(), "Listed identity provider users");
        Ok(users)
    }

    pub async fn create_user(&self, user: &NewIdentityUser) -> Result<IdentityUser, IdentityError> {
        let mut public_metadata = serde_json::Map::new();
        if let Some(school) = &user.school {
            public_metadata.insert(SCHOOL_METADATA_KEY.to_string(), Value::String(school.clone()));
        }
        let payload = json!({
            "first_name": user.first_name,
            "last_name": user.last_name,
            "email_address": [user.email],
            "public_metadata": public_metadata,
            "skip_password_requirement": true,
        });

        let request = self.request(Method::POST, &["v1", "users"])?.json(&payload);
        parse_json(self.send(request).await?).await
    }

    /// Merge `school` into the user's public metadata. `None` removes the key.
    pub async fn update_school(
        &self,
        user_id: &str,
        school: Option<&str>,
    ) -> Result<IdentityUser, IdentityError> {
        // Clerk deep-merges metadata; a null value deletes the key.
        let payload = json!({
            "public_metadata": { SCHOOL_METADATA_KEY: school },
        });

        let request = self
            .request(Method::PATCH, &["v1", "users", user_id, "metadata"])?
            .json(&payload);
        match self.send(request).await {
            Err(IdentityError::Rejected { status: 404, .. }) => {
                Err(IdentityError::NotFound(user_id.to_string()))
            }
            other => parse_json(other?).await,
        }
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, IdentityError> {
        let url = endpoint(&self.base_url, segments)?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(&self.secret_key))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, IdentityError> {
        let response = request
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(IdentityError::Rejected {
            status: status.as_u16(),
            message: extract_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Identity provider error")
                    .to_string()
            }),
        })
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, IdentityError> {
    let path = response.url().path().to_string();
    response
        .json::<T>()
        .await
        .map_err(|e| IdentityError::InvalidResponse(format!("{path}: {e}")))
}

/// Parse the base URL and make sure it ends with `/` so any path prefix is kept.
fn normalize_base_url(api_url: &str) -> Result<Url, IdentityError> {
    let trimmed = api_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| IdentityError::MissingConfig(format!("invalid CLERK_API_URL {trimmed}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(IdentityError::MissingConfig(format!(
            "invalid CLERK_API_URL {trimmed}: not a base URL"
        )));
    }
    Ok(url)
}

/// Append `segments` to the base path. Each segment is percent-encoded on its
/// own, so a `/`, `?` or `#` inside a user id stays inside that segment.
fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, IdentityError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| IdentityError::MissingConfig(format!("{base_url} is not a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// First human-readable message from a Clerk error body.
///
/// Clerk answers errors with `{"errors":[{"message":..,"long_message":..,"code":..}]}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let first = value.get("errors")?.as_array()?.first()?;
    first
        .get("long_message")
        .or_else(|| first.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Bytes,
        extract::State,
        http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri},
        Json, Router,
    };

    const SECRET: &str = "sk_test_123";

    /// One request as seen by the stand-in Clerk server.
    #[derive(Debug, Clone)]
    struct Seen {
        method: Method,
        path: String,
        query: Option<String>,
        authorization: Option<String>,
        body: Value,
    }

    impl Seen {
        fn param(&self, name: &str) -> Option<String> {
            let query = self.query.as_deref()?;
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        }
    }

    type Responder = Arc<dyn Fn(&Seen) -> (StatusCode, Value) + Send + Sync>;

    #[derive(Clone)]
    struct FakeClerk {
        seen: Arc<Mutex<Vec<Seen>>>,
        respond: Responder,
    }

    async fn record(
        State(fake): State<FakeClerk>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, Json<Value>) {
        let seen = Seen {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        };
        let (status, reply) = (fake.respond)(&seen);
        fake.seen.lock().unwrap().push(seen);
        (status, Json(reply))
    }

    /// Serve `respond` on an ephemeral local port and point a client at it.
    async fn fake_clerk(
        respond: impl Fn(&Seen) -> (StatusCode, Value) + Send + Sync + 'static,
    ) -> (ClerkClient, Arc<Mutex<Vec<Seen>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(record).with_state(FakeClerk {
            seen: seen.clone(),
            respond: Arc::new(respond),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = ClerkClient::new(&format!("http://{addr}"), SECRET).unwrap();
        (client, seen)
    }

    fn user_json(id: &str) -> Value {
        json!({
            "id": id,
            "first_name": "Minerva",
            "last_name": "McGonagall",
            "public_metadata": { "school": "Hogwarts" },
            "email_addresses": [{ "id": "idn_1", "email_address": "minerva@example.com" }]
        })
    }

    fn clerk_error(message: &str) -> Value {
        json!({ "errors": [{ "message": message, "long_message": message, "code": "x" }] })
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let base = normalize_base_url("http://localhost:9000/clerk").unwrap();
        assert_eq!(
            endpoint(&base, &["v1", "users"]).unwrap().as_str(),
            "http://localhost:9000/clerk/v1/users"
        );

        let base = normalize_base_url(DEFAULT_CLERK_API_URL).unwrap();
        assert_eq!(
            endpoint(&base, &["v1", "users", "user_1", "metadata"])
                .unwrap()
                .as_str(),
            "https://api.clerk.com/v1/users/user_1/metadata"
        );
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let base = normalize_base_url(DEFAULT_CLERK_API_URL).unwrap();

        let url = endpoint(&base, &["v1", "users", "../../v1/organizations/org_secret"]).unwrap();
        assert_eq!(url.path(), "/v1/users/..%2F..%2Fv1%2Forganizations%2Forg_secret");

        let url = endpoint(&base, &["v1", "users", "x?limit=1#top"]).unwrap();
        assert_eq!(url.path(), "/v1/users/x%3Flimit=1%23top");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(IdentityError::MissingConfig(_))
        ));
    }

    #[test]
    fn empty_secret_key_is_rejected() {
        assert!(matches!(
            ClerkClient::new(DEFAULT_CLERK_API_URL, "  "),
            Err(IdentityError::MissingConfig(_))
        ));
    }

    #[test]
    fn error_message_prefers_long_message() {
        let body = r#"{"errors":[{"message":"is taken","long_message":"That email address is taken. Please try another.","code":"form_identifier_exists"}]}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("That email address is taken. Please try another.")
        );
    }

    #[test]
    fn error_message_falls_back_to_message() {
        let body = r#"{"errors":[{"message":"not found","code":"resource_not_found"}]}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("not found"));
    }

    #[test]
    fn error_message_absent_for_non_json() {
        assert_eq!(extract_error_message("<html>bad gateway</html>"), None);
        assert_eq!(extract_error_message(r#"{"errors":[]}"#), None);
    }

    #[tokio::test]
    async fn user_id_stays_inside_the_users_path() {
        let (client, seen) = fake_clerk(|req| {
            if req.path == "/v1/organizations/org_secret" || req.query.is_some() {
                (StatusCode::OK, json!({ "id": "org_secret", "public_metadata": { "leak": true } }))
            } else {
                (StatusCode::NOT_FOUND, clerk_error("not found"))
            }
        })
        .await;

        for id in ["../../v1/organizations/org_secret", "x?limit=1", "a#b"] {
            assert!(
                matches!(client.get_user(id).await, Err(IdentityError::NotFound(_))),
                "{id}"
            );
        }
        assert!(matches!(
            client.update_school("../../v1/organizations/org_secret", Some("X")).await,
            Err(IdentityError::NotFound(_))
        ));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        for req in seen.iter() {
            assert!(req.path.starts_with("/v1/users/"), "{}", req.path);
            assert_eq!(req.query, None, "{}", req.path);
        }
        assert_eq!(seen[0].path, "/v1/users/..%2F..%2Fv1%2Forganizations%2Forg_secret");
        assert_eq!(seen[1].path, "/v1/users/x%3Flimit=1");
        assert_eq!(seen[2].path, "/v1/users/a%23b");
        assert_eq!(
            seen[3].path,
            "/v1/users/..%2F..%2Fv1%2Forganizations%2Forg_secret/metadata"
        );
    }

    #[tokio::test]
    async fn get_user_sends_secret_and_maps_404() {
        let (client, seen) = fake_clerk(|req| match req.path.as_str() {
            "/v1/users/user_1" => (StatusCode::OK, user_json("user_1")),
            _ => (StatusCode::NOT_FOUND, clerk_error("not found")),
        })
        .await;

        let user = client.get_user("user_1").await.unwrap();
        assert_eq!(user.id, "user_1");
        assert_eq!(user.school(), Some("Hogwarts"));

        assert!(matches!(
            client.get_user("user_missing").await,
            Err(IdentityError::NotFound(id)) if id == "user_missing"
        ));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::GET);
        assert_eq!(
            seen[0].authorization.as_deref(),
            Some("Bearer sk_test_123")
        );
    }

    #[tokio::test]
    async fn list_users_pages_until_short_page() {
        let (client, seen) = fake_clerk(|req| {
            let offset: usize = req.param("offset").and_then(|o| o.parse().ok()).unwrap_or(0);
            let count = if offset < 200 { LIST_PAGE_SIZE } else { 7 };
            let page: Vec<Value> = (0..count)
                .map(|i| user_json(&format!("user_{}", offset + i)))
                .collect();
            (StatusCode::OK, Value::Array(page))
        })
        .await;

        let users = client.list_users().await.unwrap();
        assert_eq!(users.len(), 207);
        assert_eq!(users[0].id, "user_0");
        assert_eq!(users[206].id, "user_206");

        let seen = seen.lock().unwrap();
        let offsets: Vec<Option<String>> = seen.iter().map(|r| r.param("offset")).collect();
        assert_eq!(
            offsets,
            vec![Some("0".into()), Some("100".into()), Some("200".into())]
        );
        for req in seen.iter() {
            assert_eq!(req.path, "/v1/users");
            assert_eq!(req.param("limit").as_deref(), Some("100"));
            assert_eq!(req.param("order_by").as_deref(), Some("-created_at"));
        }
    }

    #[tokio::test]
    async fn list_users_stops_on_empty_page() {
        let (client, seen) = fake_clerk(|req| {
            let page: Vec<Value> = match req.param("offset").as_deref() {
                Some("0") => (0..LIST_PAGE_SIZE).map(|i| user_json(&format!("user_{i}"))).collect(),
                _ => Vec::new(),
            };
            (StatusCode::OK, Value::Array(page))
        })
        .await;

        assert_eq!(client.list_users().await.unwrap().len(), LIST_PAGE_SIZE);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_user_sends_school_as_public_metadata() {
        let (client, seen) = fake_clerk(|_| (StatusCode::OK, user_json("user_new"))).await;

        let created = client
            .create_user(&NewIdentityUser {
                first_name: "Severus".to_string(),
                last_name: "Snape".to_string(),
                email: "snape@example.com".to_string(),
                school: Some("Hogwarts".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(created.id, "user_new");

        client
            .create_user(&NewIdentityUser {
                first_name: "Filius".to_string(),
                last_name: "Flitwick".to_string(),
                email: "flitwick@example.com".to_string(),
                school: None,
            })
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].path, "/v1/users");
        assert_eq!(
            seen[0].body,
            json!({
                "first_name": "Severus",
                "last_name": "Snape",
                "email_address": ["snape@example.com"],
                "public_metadata": { "school": "Hogwarts" },
                "skip_password_requirement": true
            })
        );
        assert_eq!(seen[1].body["public_metadata"], json!({}));
    }

    #[tokio::test]
    async fn update_school_patches_metadata() {
        let (client, seen) = fake_clerk(|req| {
            let mut user = user_json("user_1");
            user["public_metadata"] = req.body["public_metadata"].clone();
            (StatusCode::OK, user)
        })
        .await;

        let moved = client.update_school("user_1", Some("Durmstrang")).await.unwrap();
        assert_eq!(moved.school(), Some("Durmstrang"));

        let cleared = client.update_school("user_1", None).await.unwrap();
        assert_eq!(cleared.school(), None);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::PATCH);
        assert_eq!(seen[0].path, "/v1/users/user_1/metadata");
        assert_eq!(
            seen[0].body,
            json!({ "public_metadata": { "school": "Durmstrang" } })
        );
        assert_eq!(seen[1].body, json!({ "public_metadata": { "school": null } }));
    }

    #[tokio::test]
    async fn provider_errors_keep_status_and_message() {
        let (client, _) = fake_clerk(|req| match req.method {
            Method::POST => (
                StatusCode::UNPROCESSABLE_ENTITY,
                clerk_error("That email address is taken. Please try another."),
            ),
            _ => (StatusCode::TOO_MANY_REQUESTS, Value::Null),
        })
        .await;

        let err = client
            .create_user(&NewIdentityUser {
                first_name: "Minerva".to_string(),
                last_name: "McGonagall".to_string(),
                email: "minerva@example.com".to_string(),
                school: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IdentityError::Rejected { status: 422, ref message }
                if message == "That email address is taken. Please try another."
        ));

        let err = client.list_users().await.unwrap_err();
        assert!(matches!(
            err,
            IdentityError::Rejected { status: 429, ref message } if message == "Too Many Requests"
        ));
    }

    #[tokio::test]
    async fn unreachable_provider_is_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ClerkClient::new(&format!("http://{addr}"), SECRET).unwrap();
        assert!(matches!(
            client.get_user("user_1").await,
            Err(IdentityError::Request(_))
        ));
    }
}
