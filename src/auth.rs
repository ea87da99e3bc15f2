use crate::config::Config;
use crate::error::{auth_error, AppResult};
use crate::session::DEFAULT_TTL_SECONDS;
use tracing::info;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// How long the loopback server waits for the user to finish the consent
/// flow before the login attempt fails
const CALLBACK_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(300);

fn query_param(url: &str, key: &str) -> Option<String> {
    let marker = format!("{}=", key);
    url.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix(marker.as_str()))
        .map(str::to_string)
}

/// Extract the authorization code from the redirect URL, verifying that
/// the state parameter round-tripped unchanged
pub fn parse_callback(url: &str, expected_state: &str) -> AppResult<String> {
    if query_param(url, "state").as_deref() != Some(expected_state) {
        return Err(auth_error("State parameter mismatch in callback"));
    }
    query_param(url, "code")
        .ok_or_else(|| auth_error("No authorization code found in callback"))
}

/// Run the OAuth 2.0 loopback flow and return `(access_token, ttl_seconds)`.
///
/// Opens the system browser on the consent page, waits for the redirect on
/// a local HTTP server, then exchanges the authorization code for a token.
/// The rest of the app treats this as an opaque collaborator: it only hands
/// the session store a token and a TTL (3600 s when the provider omits
/// `expires_in`).
pub async fn authorize(config: &Config) -> AppResult<(String, i64)> {
    let client_id = config.google_client_id.clone();
    let client_secret = config.google_client_secret.clone();
    let port = config.redirect_port;
    let redirect_uri = format!("http://localhost:{}", port);

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    let auth_url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
        AUTH_ENDPOINT, client_id, redirect_uri, CALENDAR_SCOPE, state
    );

    info!("Opening browser for Google Calendar authorization");
    webbrowser::open(&auth_url)?;

    // The callback server blocks on recv, so it runs off the async runtime
    let code = tokio::task::spawn_blocking(move || -> AppResult<String> {
        let server = tiny_http::Server::http(("0.0.0.0", port))
            .map_err(|e| auth_error(&format!("Failed to start callback server: {}", e)))?;
        info!("Waiting for authorization callback on port {}", port);

        let request = server
            .recv_timeout(CALLBACK_TIMEOUT)?
            .ok_or_else(|| auth_error("Timed out waiting for authorization callback"))?;
        let url = request.url().to_string();

        let code = parse_callback(&url, &state);

        let message = if code.is_ok() {
            "Authorization successful! You can close this window."
        } else {
            "Authorization failed. You can close this window."
        };
        let _ = request.respond(tiny_http::Response::from_string(message));

        code
    })
    .await
    .map_err(|e| auth_error(&format!("Callback task failed: {}", e)))??;

    // Exchange code for a token
    let client = reqwest::Client::new();
    let response = client
        .post(TOKEN_ENDPOINT)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code".to_string()),
        ])
        .send()
        .await
        .map_err(|e| auth_error(&format!("Failed to exchange code: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(auth_error(&format!(
            "Failed to get token: HTTP {} - {}",
            status, error_body
        )));
    }

    let token_data: serde_json::Value = response
        .json()
        .await
        .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

    let access_token = token_data
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?
        .to_string();

    let expires_in = token_data
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(DEFAULT_TTL_SECONDS);

    Ok((access_token, expires_in))
}
