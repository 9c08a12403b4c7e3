use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::users::repo::{NewUser, User};
use crate::validation::{Fields, ValidationErrors};

/// Body of `POST /users`.
pub fn parse_user_body(body: &Value) -> Result<NewUser, ValidationErrors> {
    let mut fields = Fields::new(body)?;
    let name = fields.non_empty_string("name");
    let email = fields.email("email");
    fields.finish()?;

    match (name, email) {
        (Some(name), Some(email)) => Ok(NewUser { name, email }),
        _ => Err(ValidationErrors::single("body", "Invalid user")),
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
}
