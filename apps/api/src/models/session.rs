use serde::{Deserialize, Serialize};

/// The logged-in user. Persisted under the `user` namespace key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Session {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
