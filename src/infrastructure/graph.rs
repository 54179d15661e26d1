//! Blocking Microsoft Graph client over reqwest

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::domain::Query;
use crate::infrastructure::traits::GraphClient;
use crate::infrastructure::{InfraError, InfraResult};

/// Production Graph endpoint.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

/// Longest raw error body quoted back to the user.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Graph client authenticating every request with a bearer token.
pub struct HttpGraphClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpGraphClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> InfraResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InfraError::transport("build HTTP client", e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn execute(&self, context: &str, request: RequestBuilder) -> InfraResult<Response> {
        debug!("graph: {}", context);
        let response = request
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| InfraError::transport(context, e))?;

        let status = response.status();
        trace!("graph: {} -> {}", context, status);
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(graph_error(status, &body))
    }

    fn read_text(context: &str, response: Response) -> InfraResult<String> {
        response
            .text()
            .map_err(|e| InfraError::transport(context, e))
    }

    fn parse_json(context: &str, text: &str) -> InfraResult<Value> {
        serde_json::from_str(text).map_err(|source| InfraError::Decode {
            context: context.to_string(),
            source,
        })
    }
}

/// Map a failed response to [`InfraError::Graph`].
///
/// Uses the Graph error envelope `{"error": {"code", "message"}}` when the
/// body carries one, otherwise the (truncated) raw body or the status reason.
fn graph_error(status: StatusCode, body: &str) -> InfraError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return InfraError::Graph {
            status: status.as_u16(),
            code: envelope.error.code,
            message: envelope.error.message,
        };
    }
    let trimmed = body.trim();
    let message = if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("no response body").to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_BODY).collect()
    };
    InfraError::Graph {
        status: status.as_u16(),
        code: "unknown".into(),
        message,
    }
}

impl GraphClient for HttpGraphClient {
    #[instrument(skip(self))]
    fn get_json(&self, path: &str, query: &Query) -> InfraResult<Value> {
        let context = format!("GET {}", path);
        let request = self.client.get(self.url(path)).query(query.pairs());
        let response = self.execute(&context, request)?;
        let text = Self::read_text(&context, response)?;
        Self::parse_json(&context, &text)
    }

    #[instrument(skip(self, body))]
    fn post_json(&self, path: &str, body: &Value) -> InfraResult<Option<Value>> {
        let context = format!("POST {}", path);
        let request = self.client.post(self.url(path)).json(body);
        let response = self.execute(&context, request)?;
        let text = Self::read_text(&context, response)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Self::parse_json(&context, &text).map(Some)
    }

    #[instrument(skip(self, body))]
    fn patch_json(&self, path: &str, body: &Value) -> InfraResult<Value> {
        let context = format!("PATCH {}", path);
        let request = self.client.patch(self.url(path)).json(body);
        let response = self.execute(&context, request)?;
        let text = Self::read_text(&context, response)?;
        Self::parse_json(&context, &text)
    }

    #[instrument(skip(self))]
    fn delete(&self, path: &str) -> InfraResult<()> {
        let context = format!("DELETE {}", path);
        self.execute(&context, self.client.delete(self.url(path)))?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn get_bytes(&self, path: &str) -> InfraResult<Vec<u8>> {
        let context = format!("GET {}", path);
        let response = self.execute(&context, self.client.get(self.url(path)))?;
        let bytes = response
            .bytes()
            .map_err(|e| InfraError::transport(context.as_str(), e))?;
        Ok(bytes.to_vec())
    }

    #[instrument(skip(self, body), fields(len = body.len()))]
    fn put_bytes(&self, path: &str, content_type: &str, body: Vec<u8>) -> InfraResult<Value> {
        let context = format!("PUT {}", path);
        let request = self
            .client
            .put(self.url(path))
            .header(CONTENT_TYPE, content_type)
            .body(body);
        let response = self.execute(&context, request)?;
        let text = Self::read_text(&context, response)?;
        Self::parse_json(&context, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(server: &Server) -> HttpGraphClient {
        HttpGraphClient::new(&server.url(), "t0k3n", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn given_query_when_get_json_then_sends_bearer_and_odata_params() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/me/messages")
            .match_header("authorization", "Bearer t0k3n")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("$top".into(), "5".into()),
                Matcher::UrlEncoded("$orderby".into(), "receivedDateTime desc".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"value":[{"id":"m1"}]}"#)
            .create();

        let value = client(&server)
            .get_json(
                "/me/messages",
                &Query::new().top(5).order_by("receivedDateTime desc"),
            )
            .unwrap();

        assert_eq!(value["value"][0]["id"], "m1");
        mock.assert();
    }

    #[test]
    fn given_graph_error_envelope_when_get_then_maps_code_and_message() {
        let mut server = Server::new();
        server
            .mock("GET", "/me/messages/nope")
            .with_status(404)
            .with_body(r#"{"error":{"code":"ErrorItemNotFound","message":"The specified object was not found in the store."}}"#)
            .create();

        let err = client(&server)
            .get_json("/me/messages/nope", &Query::new())
            .unwrap_err();

        assert!(matches!(err, InfraError::Graph { status: 404, .. }));
        assert_eq!(
            err.to_string(),
            "Graph returned 404 (ErrorItemNotFound): The specified object was not found in the store."
        );
    }

    #[test]
    fn given_empty_error_body_when_request_then_uses_status_reason() {
        let mut server = Server::new();
        server.mock("DELETE", "/me/events/e1").with_status(401).create();

        let err = client(&server).delete("/me/events/e1").unwrap_err();

        assert!(err.to_string().contains("Unauthorized"), "{}", err);
    }

    #[test]
    fn given_accepted_without_body_when_post_then_none() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/me/sendMail")
            .match_body(Matcher::PartialJson(json!({"saveToSentItems": true})))
            .with_status(202)
            .create();

        let result = client(&server)
            .post_json("/me/sendMail", &json!({"saveToSentItems": true}))
            .unwrap();

        assert!(result.is_none());
        mock.assert();
    }

    #[test]
    fn given_bytes_when_put_then_sets_content_type() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/me/drive/root:/a.txt:/content")
            .match_header("content-type", "application/octet-stream")
            .match_body("hello")
            .with_status(201)
            .with_body(r#"{"id":"f1","name":"a.txt","size":5}"#)
            .create();

        let value = client(&server)
            .put_bytes(
                "/me/drive/root:/a.txt:/content",
                "application/octet-stream",
                b"hello".to_vec(),
            )
            .unwrap();

        assert_eq!(value["size"], 5);
        mock.assert();
    }

    #[test]
    fn given_non_json_success_when_get_json_then_decode_error() {
        let mut server = Server::new();
        server
            .mock("GET", "/me")
            .with_status(200)
            .with_body("<html>")
            .create();

        let err = client(&server).get_json("/me", &Query::new()).unwrap_err();

        assert!(matches!(err, InfraError::Decode { .. }));
    }

    #[test]
    fn given_trailing_slash_base_url_when_new_then_no_double_slash() {
        let mut server = Server::new();
        let mock = server.mock("GET", "/me").with_body("{}").create();
        let client =
            HttpGraphClient::new(&format!("{}/", server.url()), "t", Duration::from_secs(5))
                .unwrap();

        client.get_json("/me", &Query::new()).unwrap();

        mock.assert();
    }
}
