use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::repositories::RepositoryError;

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// A table request: filters, ordering and limit as PostgREST query params
#[derive(Debug, Clone)]
pub struct Query {
    table: String,
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            params: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params
            .push(("order".to_string(), format!("{}.{}", column, direction)));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Map a failed PostgREST response onto a repository error
pub(crate) fn map_error(status: StatusCode, body: &str) -> RepositoryError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone());
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body));

    if status == StatusCode::CONFLICT || code.as_deref() == Some(UNIQUE_VIOLATION) {
        RepositoryError::AlreadyExists(message)
    } else if status == StatusCode::NOT_FOUND {
        RepositoryError::NotFound(message)
    } else {
        RepositoryError::Database(message)
    }
}

/// First row of a `return=representation` response
pub(crate) fn single<T>(mut rows: Vec<T>, table: &str) -> Result<T, RepositoryError> {
    if rows.is_empty() {
        return Err(RepositoryError::Decode(format!("insert into {} returned no row", table)));
    }
    Ok(rows.swap_remove(0))
}

/// Thin PostgREST client over `/rest/v1`
#[derive(Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl PostgrestClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str, access_token: Option<&str>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: access_token.map(str::to_string),
        }
    }

    fn request(&self, method: reqwest::Method, query: &Query) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, query.table());
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        tracing::debug!("{} {} {:?}", method, url, query.params());
        self.http
            .request(method, url)
            .query(query.params())
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    async fn send(builder: RequestBuilder) -> Result<Response, RepositoryError> {
        let response = builder
            .send()
            .await
            .map_err(|e| RepositoryError::Network(e.to_string()))?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(map_error(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RepositoryError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Decode(e.to_string()))
    }

    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, RepositoryError> {
        let response = Self::send(self.request(reqwest::Method::GET, query)).await?;
        Self::decode(response).await
    }

    /// Insert and return the stored rows
    pub async fn insert<B, T>(&self, query: &Query, body: &B) -> Result<Vec<T>, RepositoryError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self
            .request(reqwest::Method::POST, query)
            .header("Prefer", "return=representation")
            .json(body);
        let response = Self::send(builder).await?;
        Self::decode(response).await
    }

    /// Insert without reading anything back
    pub async fn insert_minimal<B>(&self, query: &Query, body: &B) -> Result<(), RepositoryError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let builder = self
            .request(reqwest::Method::POST, query)
            .header("Prefer", "return=minimal")
            .json(body);
        Self::send(builder).await.map(|_| ())
    }

    pub async fn update<B>(&self, query: &Query, body: &B) -> Result<(), RepositoryError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let builder = self.request(reqwest::Method::PATCH, query).json(body);
        Self::send(builder).await.map(|_| ())
    }

    pub async fn delete(&self, query: &Query) -> Result<(), RepositoryError> {
        Self::send(self.request(reqwest::Method::DELETE, query))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let query = Query::new("quiz_sessions")
            .select("*")
            .eq("quiz_id", "q1")
            .order("created_at", false)
            .limit(1);

        assert_eq!(query.table(), "quiz_sessions");
        let params: Vec<(&str, &str)> = query
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("select", "*"),
                ("quiz_id", "eq.q1"),
                ("order", "created_at.desc"),
                ("limit", "1"),
            ]
        );
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint","details":null,"hint":null}"#;
        let err = map_error(StatusCode::CONFLICT, body);
        assert!(err.is_conflict());
        assert!(err.message().starts_with("duplicate key"));

        // code alone is enough
        assert!(map_error(StatusCode::BAD_REQUEST, body).is_conflict());
    }

    #[test]
    fn test_other_errors() {
        let err = map_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, RepositoryError::Database(ref m) if m == "HTTP 500: boom"));

        let err = map_error(StatusCode::NOT_FOUND, r#"{"message":"relation does not exist"}"#);
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
