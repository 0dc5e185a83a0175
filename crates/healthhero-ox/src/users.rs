use bon::Builder;
use serde::{Deserialize, Serialize};

/// A registered account, as returned by the users endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Credentials for `users/login`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Payload for account registration
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct RegisterRequest {
    #[builder(into)]
    pub email: String,
    #[builder(into)]
    pub username: String,
    #[builder(into)]
    pub password: String,
}

/// Successful login: a JWT plus the full user row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_decodes_backend_shape() {
        let json = r#"{
            "access_token": "jwt.token.here",
            "token_type": "bearer",
            "user": {"id": 3, "username": "ada", "email": "ada@example.com"}
        }"#;

        let login: LoginResponse = serde_json::from_str(json).expect("decode login");
        assert_eq!(login.token_type, "bearer");
        assert_eq!(login.user.id, 3);
    }

    #[test]
    fn register_request_builder() {
        let request = RegisterRequest::builder()
            .email("ada@example.com")
            .username("ada")
            .password("hunter2")
            .build();

        let json = serde_json::to_value(&request).expect("encode register");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["username"], "ada");
    }
}
