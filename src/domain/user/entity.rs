// src/domain/user/entity.rs

/// A member record as held by the platform's user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl DirectoryUser {
    pub fn new(id: impl Into<String>, name: Option<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            email,
        }
    }
}
