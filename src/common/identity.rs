use serde::{Deserialize, Serialize};

/// Người dùng đã đăng nhập (do tầng xác thực bên ngoài cung cấp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

/// Identity context passed explicitly into the session. `None` means the
/// user is not authenticated; the session still connects in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity {
    user: Option<User>,
}

impl SessionIdentity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|user| user.email.as_str())
            .unwrap_or("anonymous")
    }
}
