//! Authentication DTOs and roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credentials posted to the login endpoint.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub nombre_completo: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

/// Profile persisted next to the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre_completo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl UserInfo {
    /// Name to greet the user with, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.nombre_completo
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }

    pub fn role(&self) -> Role {
        Role::from_code(&self.role)
    }
}

impl From<&AuthResponse> for UserInfo {
    fn from(resp: &AuthResponse) -> Self {
        Self {
            email: resp.email.clone(),
            role: resp.role.clone(),
            nombre_completo: resp.nombre_completo.clone(),
            id: resp.id,
        }
    }
}

/// Backend role codes. Matching is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Cliente,
    Profesor,
    Unknown(String),
}

impl Role {
    pub fn from_code(code: &str) -> Self {
        match code {
            "ROLE_ADMIN" => Role::Admin,
            "ROLE_CLIENTE" => Role::Cliente,
            "ROLE_PROFESOR" => Role::Profesor,
            other => Role::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Cliente => "ROLE_CLIENTE",
            Role::Profesor => "ROLE_PROFESOR",
            Role::Unknown(code) => code,
        }
    }
}

/// Body for requesting a password reset code.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body for setting a new password with a reset code.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_matching_is_exact() {
        assert_eq!(Role::from_code("ROLE_ADMIN"), Role::Admin);
        assert_eq!(Role::from_code("role_admin"), Role::Unknown("role_admin".to_string()));
        assert_eq!(Role::from_code("ROLE_PROFESOR").code(), "ROLE_PROFESOR");
    }

    #[test]
    fn test_display_name_fallback() {
        let mut user = UserInfo {
            email: "ana@talleres.pe".to_string(),
            role: "ROLE_CLIENTE".to_string(),
            nombre_completo: Some("Ana Torres".to_string()),
            id: Some(4),
        };
        assert_eq!(user.display_name(), "Ana Torres");
        user.nombre_completo = Some("  ".to_string());
        assert_eq!(user.display_name(), "ana@talleres.pe");
    }

    #[test]
    fn test_login_request_debug_hides_password() {
        let req = LoginRequest {
            email: "a@b.pe".to_string(),
            password: "secreto".to_string(),
        };
        assert!(!format!("{req:?}").contains("secreto"));
    }

    #[test]
    fn test_auth_response_from_camel_case() {
        let json = r#"{"token":"t","email":"a@b.pe","role":"ROLE_ADMIN","nombreCompleto":"Admin"}"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        let info = UserInfo::from(&resp);
        assert_eq!(info.nombre_completo.as_deref(), Some("Admin"));
        assert_eq!(info.role(), Role::Admin);
        assert_eq!(info.id, None);
    }
}
