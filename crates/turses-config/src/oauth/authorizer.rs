//! Three-legged OAuth 1.0a with an out-of-band PIN
//!
//! ```text
//! Init ──► RequestSent ──► Authorized ──► PinEntered ──► AccessGranted
//!               │                              │
//!               ▼                              ▼
//!         RequestFailed                  AccessDenied
//! ```
//!
//! There is no retry: a failed attempt has to start over from `Init`.

use super::signature::{self, Consumer, HttpMethod, SigningInput};
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::{ConfigError, Result};
use crate::prompt::Prompt;
use crate::token::Credential;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

const REQUEST_TOKEN_PATH: &str = "/oauth/request_token";
const AUTHORIZE_PATH: &str = "/oauth/authorize";
const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

/// Where the authorization attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Init,
    RequestSent,
    RequestFailed,
    Authorized,
    PinEntered,
    AccessGranted,
    AccessDenied,
}

impl AuthState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AuthState::RequestFailed | AuthState::AccessGranted | AuthState::AccessDenied
        )
    }
}

/// Something that can obtain a fresh credential for the user
pub trait Authorize {
    fn authorize(&mut self, prompt: &mut dyn Prompt) -> Result<Credential>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    oauth_token: String,
    oauth_token_secret: String,
}

impl From<TokenResponse> for Credential {
    fn from(response: TokenResponse) -> Self {
        Credential::new(response.oauth_token, response.oauth_token_secret)
    }
}

fn parse_token_response(body: &str) -> Result<Credential> {
    serde_urlencoded::from_str::<TokenResponse>(body)
        .map(Credential::from)
        .map_err(|e| ConfigError::MalformedResponse(e.to_string()))
}

/// PIN-based authorizer against a fixed OAuth service
pub struct OAuthAuthorizer<T> {
    transport: T,
    consumer: Consumer,
    base_url: String,
    state: AuthState,
}

impl<T: HttpTransport> OAuthAuthorizer<T> {
    /// Authorizer for the default service with the built-in consumer
    pub fn new(transport: T) -> Self {
        Self::with_base_url(transport, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            consumer: Consumer::builtin(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            state: AuthState::Init,
        }
    }

    pub fn with_consumer(mut self, consumer: Consumer) -> Self {
        self.consumer = consumer;
        self
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// URL the user visits to approve `request_token`
    pub fn authorization_url(&self, request_token: &Credential) -> String {
        format!(
            "{}{}?oauth_token={}",
            self.base_url,
            AUTHORIZE_PATH,
            signature::percent_encode(&request_token.oauth_token)
        )
    }

    /// Leg one: obtain a temporary request token
    pub fn request_token(&mut self) -> Result<Credential> {
        if self.consumer.key.is_empty() {
            self.state = AuthState::RequestFailed;
            return Err(ConfigError::MissingConsumerKey);
        }

        let url = format!("{}{}", self.base_url, REQUEST_TOKEN_PATH);
        let response = self.send(HttpMethod::Get, &url, None, &[("oauth_callback", "oob")]);
        self.state = AuthState::RequestSent;

        let response = match response {
            Ok(response) if response.is_ok() => response,
            Ok(response) => {
                self.state = AuthState::RequestFailed;
                return Err(ConfigError::RequestTokenFailed {
                    status: response.status,
                });
            }
            Err(e) => {
                self.state = AuthState::RequestFailed;
                return Err(e);
            }
        };

        match parse_token_response(&response.body) {
            Ok(token) => {
                self.state = AuthState::Authorized;
                Ok(token)
            }
            Err(e) => {
                self.state = AuthState::RequestFailed;
                Err(e)
            }
        }
    }

    /// Leg three: exchange the approved request token and PIN for an access token
    pub fn access_token(&mut self, request_token: &Credential, pin: &str) -> Result<Credential> {
        self.state = AuthState::PinEntered;
        let url = format!("{}{}", self.base_url, ACCESS_TOKEN_PATH);

        let response = match self.send(
            HttpMethod::Post,
            &url,
            Some(request_token),
            &[("oauth_verifier", pin)],
        ) {
            Ok(response) => response,
            Err(e) => {
                self.state = AuthState::AccessDenied;
                return Err(e);
            }
        };

        if !response.is_ok() {
            self.state = AuthState::AccessDenied;
            return Err(ConfigError::AccessDenied {
                status: response.status,
                body: serde_urlencoded::from_str(&response.body).unwrap_or_default(),
            });
        }

        match parse_token_response(&response.body) {
            Ok(token) => {
                self.state = AuthState::AccessGranted;
                log::info!("Access token granted");
                Ok(token)
            }
            Err(e) => {
                self.state = AuthState::AccessDenied;
                Err(e)
            }
        }
    }

    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        token: Option<&Credential>,
        oauth_params: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let nonce = signature::generate_nonce();
        let input = SigningInput {
            method,
            url,
            consumer: &self.consumer,
            token,
            oauth_params,
            request_params: &[],
            nonce: &nonce,
            timestamp: signature::timestamp(),
        };
        let request = HttpRequest {
            method,
            url: url.to_string(),
            authorization: input.authorization_header()?,
        };
        self.transport.send(&request)
    }
}

impl<T: HttpTransport> Authorize for OAuthAuthorizer<T> {
    fn authorize(&mut self, prompt: &mut dyn Prompt) -> Result<Credential> {
        self.state = AuthState::Init;

        prompt.show(&format!("Requesting temp token from {}", self.base_url));
        let request_token = self.request_token().inspect_err(|e| {
            log::error!("Request token failed: {}", e);
            prompt.show(&e.to_string());
        })?;

        prompt.show("");
        prompt.show("Please visit the following page to retrieve needed pin code");
        prompt.show("to obtain an Authentication Token:");
        prompt.show("");
        prompt.show(&self.authorization_url(&request_token));
        prompt.show("");

        let pin = prompt.ask("Pin code? ").map_err(ConfigError::Prompt)?;

        prompt.show("");
        prompt.show("Generating and signing request for an access token");
        prompt.show("");
        self.access_token(&request_token, pin.trim())
            .inspect_err(|e| {
                log::error!("Access token failed: {}", e);
                prompt.show(&e.to_string());
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTransport, ScriptedPrompt};

    fn authorizer(transport: &FakeTransport) -> OAuthAuthorizer<&FakeTransport> {
        OAuthAuthorizer::with_base_url(transport, "https://oauth.test/")
            .with_consumer(Consumer::new("ckey", "csecret"))
    }

    #[test]
    fn test_successful_pin_flow() {
        let transport = FakeTransport::new(vec![
            HttpResponse::new(200, "oauth_token=T1&oauth_token_secret=S1&oauth_callback_confirmed=true"),
            HttpResponse::new(200, "oauth_token=T2&oauth_token_secret=S2&user_id=1&screen_name=ana"),
        ]);
        let mut prompt = ScriptedPrompt::new(["123456"]);
        let mut auth = authorizer(&transport);

        let credential = auth.authorize(&mut prompt).unwrap();

        assert_eq!(credential, Credential::new("T2", "S2"));
        assert_eq!(auth.state(), AuthState::AccessGranted);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "https://oauth.test/oauth/request_token");
        assert!(requests[0].authorization.contains("oauth_callback=\"oob\""));
        assert!(requests[0].authorization.contains("oauth_consumer_key=\"ckey\""));
        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].url, "https://oauth.test/oauth/access_token");
        assert!(requests[1].authorization.contains("oauth_token=\"T1\""));
        assert!(requests[1].authorization.contains("oauth_verifier=\"123456\""));

        assert!(prompt
            .shown()
            .iter()
            .any(|line| line == "https://oauth.test/oauth/authorize?oauth_token=T1"));
    }

    #[test]
    fn test_request_token_failure_stops_the_flow() {
        let transport = FakeTransport::new(vec![HttpResponse::new(401, "")]);
        let mut prompt = ScriptedPrompt::new(["never asked"]);
        let mut auth = authorizer(&transport);

        let err = auth.authorize(&mut prompt).unwrap_err();

        assert!(matches!(err, ConfigError::RequestTokenFailed { status: 401 }));
        assert_eq!(auth.state(), AuthState::RequestFailed);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(prompt.remaining_answers(), 1);
    }

    #[test]
    fn test_missing_consumer_key_fails_before_sending() {
        let transport = FakeTransport::new(vec![HttpResponse::new(200, "oauth_token=T1")]);
        let mut prompt = ScriptedPrompt::new(["never asked"]);
        let mut auth = OAuthAuthorizer::with_base_url(&transport, "https://oauth.test")
            .with_consumer(Consumer::new("", ""));

        let err = auth.authorize(&mut prompt).unwrap_err();

        assert!(matches!(err, ConfigError::MissingConsumerKey));
        assert_eq!(auth.state(), AuthState::RequestFailed);
        assert!(transport.requests().is_empty());
        assert_eq!(prompt.remaining_answers(), 1);
    }

    #[test]
    fn test_access_denied_reports_status_and_body() {
        let transport = FakeTransport::new(vec![
            HttpResponse::new(200, "oauth_token=T1&oauth_token_secret=S1"),
            HttpResponse::new(401, "error=invalid_verifier"),
        ]);
        let mut prompt = ScriptedPrompt::new(["000000"]);
        let mut auth = authorizer(&transport);

        let err = auth.authorize(&mut prompt).unwrap_err();

        match err {
            ConfigError::AccessDenied { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, vec![("error".to_string(), "invalid_verifier".to_string())]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(auth.state(), AuthState::AccessDenied);
        assert!(auth.state().is_terminal());
    }

    #[test]
    fn test_malformed_request_token_body() {
        let transport = FakeTransport::new(vec![HttpResponse::new(200, "oauth_token=T1")]);
        let mut auth = authorizer(&transport);

        let err = auth.request_token().unwrap_err();

        assert!(matches!(err, ConfigError::MalformedResponse(_)));
        assert_eq!(auth.state(), AuthState::RequestFailed);
    }

    #[test]
    fn test_pin_is_trimmed() {
        let transport = FakeTransport::new(vec![
            HttpResponse::new(200, "oauth_token=T1&oauth_token_secret=S1"),
            HttpResponse::new(200, "oauth_token=T2&oauth_token_secret=S2"),
        ]);
        let mut prompt = ScriptedPrompt::new(["  42  "]);

        authorizer(&transport).authorize(&mut prompt).unwrap();

        assert!(transport.requests()[1]
            .authorization
            .contains("oauth_verifier=\"42\""));
    }

    #[test]
    fn test_authorize_restarts_from_init() {
        let transport = FakeTransport::new(vec![
            HttpResponse::new(500, ""),
            HttpResponse::new(200, "oauth_token=T1&oauth_token_secret=S1"),
            HttpResponse::new(200, "oauth_token=T2&oauth_token_secret=S2"),
        ]);
        let mut prompt = ScriptedPrompt::new(["1"]);
        let mut auth = authorizer(&transport);

        assert!(auth.authorize(&mut prompt).is_err());
        assert_eq!(auth.state(), AuthState::RequestFailed);

        let credential = auth.authorize(&mut prompt).unwrap();
        assert_eq!(credential, Credential::new("T2", "S2"));
        assert_eq!(auth.state(), AuthState::AccessGranted);
    }
}
