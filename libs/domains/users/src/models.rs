use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// User entity, stored as one record keyed by `email`.
///
/// Every field defaults to an empty string when absent from a payload, so a
/// body without `email` fails email validation rather than decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Unique key of the record
    #[schema(example = "a@b.com")]
    pub email: String,
    #[schema(example = "Ann")]
    pub first_name: String,
    #[schema(example = "Lee")]
    pub last_name: String,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Overwrite the name fields present in `update`. The key never changes.
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
    }
}

/// Partial update payload.
///
/// `email` may be sent for symmetry with [`User`], but must match the record
/// being updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Query parameters selecting a single user
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    /// Email of the target user; omit on `GET` to list every user
    pub email: Option<String>,
}

/// `GET` response body: one user when `email` is given, otherwise all users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UserLookup {
    One(User),
    Many(Vec<User>),
}
