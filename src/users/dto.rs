use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: Option<String>,
    pub password: Option<String>,
}

impl CreateUserRequest {
    /// Blank display names are stored as NULL.
    pub fn display_name(&self) -> Option<String> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_display_name_is_dropped() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email":"a@x.com","display_name":"   "}"#).unwrap();
        assert_eq!(req.display_name(), None);
        assert!(req.password.is_none());

        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email":"a@x.com","display_name":" Ann "}"#).unwrap();
        assert_eq!(req.display_name().as_deref(), Some("Ann"));
    }
}
