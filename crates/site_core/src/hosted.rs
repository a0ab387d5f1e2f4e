//! REST access to the hosted `blogs` table (PostgREST conventions).

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use shared::{
    domain::{BlogPost, PostId},
    error::{GatewayError, Operation},
    protocol::PostPayload,
};
use tracing::{debug, warn};
use url::Url;

use crate::table::PostTable;

const TABLE_PATH: &str = "rest/v1/blogs";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: Option<String>,
    hint: Option<String>,
}

pub struct HostedPostTable {
    http: Client,
    table_url: Url,
    api_key: String,
}

impl HostedPostTable {
    pub fn new(service_url: &str, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_client(Client::new(), service_url, api_key)
    }

    pub fn with_client(
        http: Client,
        service_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let mut base = Url::parse(service_url.trim()).map_err(|e| {
            GatewayError::unavailable(format!("invalid content service url '{service_url}': {e}"))
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let table_url = base.join(TABLE_PATH).map_err(|e| {
            GatewayError::unavailable(format!("invalid content service url '{service_url}': {e}"))
        })?;

        Ok(Self {
            http,
            table_url,
            api_key: api_key.into(),
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.table_url.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
    }

    async fn read_rows(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Vec<BlogPost>, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::unavailable(format!("{operation}: {e}")))?;
        let response = match check_status(operation, response).await {
            Ok(response) => response,
            Err(GatewayError::Service { message, .. }) => {
                return Err(GatewayError::unavailable(format!("{operation}: {message}")));
            }
            Err(err) => return Err(err),
        };
        response
            .json()
            .await
            .map_err(|e| GatewayError::unavailable(format!("{operation}: malformed rows: {e}")))
    }

    async fn write_rows(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Vec<BlogPost>, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::service(operation, e.to_string()))?;
        check_status(operation, response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::service(operation, format!("malformed rows: {e}")))
    }
}

fn eq_filter(id: &PostId) -> String {
    format!("eq.{}", id.as_str())
}

async fn check_status(
    operation: Operation,
    response: Response,
) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ServiceErrorBody>(&body) {
        Ok(ServiceErrorBody {
            message: Some(message),
            hint,
        }) => match hint {
            Some(hint) => format!("{message} ({hint})"),
            None => message,
        },
        _ => format!("service responded with status {status}"),
    };
    warn!(%operation, %status, %message, "content service rejected request");
    Err(GatewayError::service(operation, message))
}

#[async_trait]
impl PostTable for HostedPostTable {
    async fn select_all(&self) -> Result<Vec<BlogPost>, GatewayError> {
        let request = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let rows = self.read_rows(Operation::ListPosts, request).await?;
        debug!(count = rows.len(), "fetched posts");
        Ok(rows)
    }

    async fn select_by_id(&self, id: &PostId) -> Result<Option<BlogPost>, GatewayError> {
        let request = self
            .request(Method::GET)
            .query(&[("select", "*".to_string()), ("id", eq_filter(id))]);
        let rows = self.read_rows(Operation::GetPost, request).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, payload: &PostPayload) -> Result<BlogPost, GatewayError> {
        let request = self
            .request(Method::POST)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(payload);
        self.write_rows(Operation::InsertPost, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::service(Operation::InsertPost, "service returned no row"))
    }

    async fn update(&self, id: &PostId, payload: &PostPayload) -> Result<BlogPost, GatewayError> {
        let request = self
            .request(Method::PATCH)
            .query(&[("id", eq_filter(id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(payload);
        self.write_rows(Operation::UpdatePost, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    async fn delete(&self, id: &PostId) -> Result<(), GatewayError> {
        let response = self
            .request(Method::DELETE)
            .query(&[("id", eq_filter(id))])
            .send()
            .await
            .map_err(|e| GatewayError::service(Operation::DeletePost, e.to_string()))?;
        let status = check_status(Operation::DeletePost, response).await?.status();
        debug!(id = %id, %status, "deleted post");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/hosted_tests.rs"]
mod tests;
