// ============================================================================
// API Client : OWNLY
// ============================================================================
// Client HTTP partagé par tous les endpoints (deals, investissements,
// portefeuille, marché secondaire, bundles)
//
// CONCEPTS RUST :
// 1. async/await : les appels réseau ne bloquent pas le thread
// 2. Clone bon marché : reqwest::Client contient un Arc interne, cloner le
//    client partage le même pool de connexions
// 3. Result<T, ApiError> : erreurs typées à la frontière réseau
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::api::error::{ApiError, GENERIC_FAILURE};
use crate::api::wire::error_message;

/// Client de l'API OWNLY
#[derive(Debug, Clone)]
pub struct OwnlyClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl OwnlyClient {
    /// Crée un client pour une URL de base (ex: "https://api.ownly.io/api")
    ///
    /// # Arguments
    /// * `base_url` - Racine de l'API, les chemins sont ajoutés derrière
    /// * `token` - Token Bearer optionnel (session utilisateur)
    /// * `timeout` - Délai maximum par requête
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("URL de l'API invalide : {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("L'URL de l'API ne peut pas servir de base : {}", base_url);
        }

        debug!("Creating HTTP client");
        let http = reqwest::Client::builder()
            .user_agent(concat!("ownly-tui/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Construit l'URL d'un endpoint à partir de segments de chemin
    ///
    /// Chaque segment est encodé : un identifiant contenant "/" ou "?" ne
    /// peut pas changer le chemin appelé. Les segments vides, "." et ".."
    /// sont refusés (l'URL les normaliserait vers un autre endpoint).
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(s.trim(), "" | "." | "..")) {
            warn!(segment = %bad, "Rejected path segment");
            return Err(ApiError::InvalidUrl(format!(
                "segment de chemin interdit {:?} dans /{}",
                bad,
                segments.join("/")
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET avec paramètres de query string
    pub(crate) async fn get_json(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(segments)?;
        let request = self.http.get(url).query(query);
        self.send(Method::GET, request).await
    }

    /// POST avec un corps JSON
    pub(crate) async fn post_json(&self, segments: &[&str], body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(segments)?;
        let request = self.http.post(url).json(body);
        self.send(Method::POST, request).await
    }

    /// Envoie la requête et convertit la réponse
    ///
    /// - 2xx : corps JSON (corps vide -> null), sauf `success: false`
    /// - autre : ApiError::Status avec le message de l'enveloppe d'erreur
    #[instrument(skip(self, method, request), fields(method = %method))]
    async fn send(&self, method: Method, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        debug!(status = %status, url = %url, "Received HTTP response");

        let body = response.text().await?;
        let json = if body.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&body) {
                Ok(json) => json,
                Err(e) if status.is_success() => return Err(ApiError::Decode(e)),
                // Erreur non JSON (page HTML d'un proxy...) : message générique
                Err(_) => Value::Null,
            }
        };

        if !status.is_success() {
            let message = error_message(&json).unwrap_or_else(|| fallback_message(status));
            error!(status = %status, url = %url, message = %message, "OWNLY API returned error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        // Certains endpoints répondent 200 avec { success: false, message }
        if json.get("success") == Some(&Value::Bool(false)) {
            let message = error_message(&json).unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!(url = %url, message = %message, "OWNLY API reported failure in a 2xx response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(json)
    }
}

fn fallback_message(status: StatusCode) -> String {
    format!(
        "Le serveur a répondu HTTP {} ({})",
        status.as_u16(),
        status.canonical_reason().unwrap_or("erreur")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> OwnlyClient {
        OwnlyClient::new(base, None, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let c = client("https://api.ownly.io/api/");
        let url = c.endpoint(&["deals", "42"]).unwrap();
        assert_eq!(url.as_str(), "https://api.ownly.io/api/deals/42");

        let c = client("https://api.ownly.io/api");
        let url = c.endpoint(&["secondary-market", "listings"]).unwrap();
        assert_eq!(url.as_str(), "https://api.ownly.io/api/secondary-market/listings");
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let c = client("https://api.ownly.io/api");
        let url = c.endpoint(&["deals", "../wallet"]).unwrap();
        assert_eq!(url.path(), "/api/deals/..%2Fwallet");
    }

    #[test]
    fn test_endpoint_rejects_dot_segments() {
        let c = client("https://api.ownly.io/api");
        for id in ["..", ".", "", "  "] {
            match c.endpoint(&["deals", id]) {
                Err(ApiError::InvalidUrl(_)) => {}
                other => panic!("expected InvalidUrl for {:?}, got {:?}", id, other),
            }
        }
        assert!(c.endpoint(&["secondary-market", "listings", "..", "offer"]).is_err());
        // Un id qui contient des points reste valide
        assert!(c.endpoint(&["deals", "v1.2"]).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(OwnlyClient::new("not a url", None, Duration::from_secs(1)).is_err());
        assert!(OwnlyClient::new("mailto:team@ownly.io", None, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let c = OwnlyClient::new("http://localhost:4000/api", Some("  ".to_string()), Duration::from_secs(1)).unwrap();
        assert!(!c.has_token());
    }

    #[test]
    fn test_fallback_message() {
        assert_eq!(
            fallback_message(StatusCode::SERVICE_UNAVAILABLE),
            "Le serveur a répondu HTTP 503 (Service Unavailable)"
        );
    }

    // Serveur HTTP local à une seule réponse, pour tester `send` sans réseau
    async fn serve_once(status_line: &'static str, content_type: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/api", addr)
    }

    #[tokio::test]
    async fn test_error_status_keeps_server_message() {
        let base = serve_once(
            "422 Unprocessable Entity",
            "application/json",
            r#"{"success":false,"message":"Amount is below the minimum ticket"}"#,
        )
        .await;
        match client(&base).get_json(&["deals"], &[]).await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "Amount is below the minimum ticket");
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_uses_fallback_message() {
        let base = serve_once("502 Bad Gateway", "text/html", "<html>Bad gateway</html>").await;
        match client(&base).get_json(&["deals"], &[]).await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, fallback_message(StatusCode::BAD_GATEWAY));
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_false_in_2xx_is_status_error() {
        let base = serve_once(
            "200 OK",
            "application/json",
            r#"{"success":false,"message":"Insufficient wallet balance"}"#,
        )
        .await;
        let err = client(&base).get_json(&["wallet", "balance"], &[]).await.unwrap_err();
        assert_eq!(err.status(), Some(200));
        assert_eq!(err.user_message(), "Insufficient wallet balance");
    }

    #[tokio::test]
    async fn test_empty_2xx_body_is_null() {
        let base = serve_once("200 OK", "application/json", "").await;
        let value = client(&base).get_json(&["deals"], &[]).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_json_in_2xx_is_decode_error() {
        let base = serve_once("200 OK", "application/json", "{oops").await;
        match client(&base).get_json(&["deals"], &[]).await {
            Err(ApiError::Decode(_)) => {}
            other => panic!("expected Decode error, got {:?}", other),
        }
    }

    // Test async nécessite tokio test runtime
    // Port 9 (discard) : rien n'écoute, la connexion est refusée
    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let c = client("http://127.0.0.1:9/api");
        match c.get_json(&["deals"], &[]).await {
            Err(ApiError::Http(_)) => {}
            other => panic!("expected Http error, got {:?}", other),
        }
    }
}
