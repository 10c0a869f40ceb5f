use crate::validation::ValidationError;
use std::fmt;

/// Bambu Cloud error type
///
/// Represents every failure an authenticated client operation can surface.
/// Nothing is retried or recovered locally; each variant reaches the caller.
#[derive(Debug)]
pub enum CloudError {
    /// Login failed
    Login(LoginError),
    /// HTTP request failed (network, non-2xx status, or unparsable body)
    Request(RequestError),
    /// Response body did not match the expected model
    Validation(ValidationError),
    /// Access token could not be decoded
    Token(TokenError),
}

impl fmt::Display for CloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudError::Login(err) => write!(f, "Login failed: {}", err),
            CloudError::Request(err) => write!(f, "Request failed: {}", err),
            CloudError::Validation(err) => write!(f, "Validation failed: {}", err),
            CloudError::Token(err) => write!(f, "Token error: {}", err),
        }
    }
}

impl std::error::Error for CloudError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CloudError::Login(err) => Some(err),
            CloudError::Request(err) => Some(err),
            CloudError::Validation(err) => Some(err),
            CloudError::Token(err) => Some(err),
        }
    }
}

impl From<LoginError> for CloudError {
    fn from(err: LoginError) -> Self {
        CloudError::Login(err)
    }
}

impl From<RequestError> for CloudError {
    fn from(err: RequestError) -> Self {
        CloudError::Request(err)
    }
}

impl From<ValidationError> for CloudError {
    fn from(err: ValidationError) -> Self {
        CloudError::Validation(err)
    }
}

impl From<TokenError> for CloudError {
    fn from(err: TokenError) -> Self {
        CloudError::Token(err)
    }
}

/// HTTP-level errors
#[derive(Debug)]
pub enum RequestError {
    /// Network error (connection, timeout, etc.)
    Network(String),
    /// HTTP error with status code
    Http { status: u16, message: String },
    /// Response body was not valid JSON
    Parse(String),
    /// Request building failed
    Request(String),
}

impl RequestError {
    /// HTTP status code, if the server answered with a non-2xx status
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Network(msg) => write!(f, "Network error: {}", msg),
            RequestError::Http { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            RequestError::Parse(msg) => write!(f, "Parse error: {}", msg),
            RequestError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Network("Request timeout".to_string())
        } else if err.is_connect() {
            RequestError::Network(format!("Connection failed: {}", err))
        } else if err.is_builder() {
            RequestError::Request(err.to_string())
        } else if let Some(status) = err.status() {
            RequestError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            RequestError::Network(err.to_string())
        }
    }
}

/// Errors raised at the login boundary
#[derive(Debug)]
pub enum LoginError {
    /// The login request itself failed
    Request(RequestError),
    /// The login response did not contain a usable access token
    InvalidResponse(ValidationError),
    /// The access token could not be turned into a [`Token`](crate::Token)
    Token(TokenError),
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::Request(err) => write!(f, "login request failed: {}", err),
            LoginError::InvalidResponse(err) => {
                write!(f, "failed to parse login response: {}", err)
            }
            LoginError::Token(err) => write!(f, "invalid access token: {}", err),
        }
    }
}

impl std::error::Error for LoginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoginError::Request(err) => Some(err),
            LoginError::InvalidResponse(err) => Some(err),
            LoginError::Token(err) => Some(err),
        }
    }
}

/// Errors from decoding an access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The string is not a well-formed JWT
    Malformed(String),
    /// The claims carry no non-empty `username`
    MissingUsername,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed(msg) => write!(f, "Invalid JWT token: {}", msg),
            TokenError::MissingUsername => write!(f, "Invalid JWT token: username not found"),
        }
    }
}

impl std::error::Error for TokenError {}
