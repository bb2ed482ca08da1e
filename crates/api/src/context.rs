use logbook_core::Username;

/// Verified identity for a request.
///
/// Inserted into request extensions by the auth gate; only present on
/// protected routes, and only after the token checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    username: Username,
}

impl AuthenticatedUser {
    pub fn new(username: Username) -> Self {
        Self { username }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn into_username(self) -> Username {
        self.username
    }
}
