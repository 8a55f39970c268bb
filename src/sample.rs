//! Sample service: look a user up by id.
//!
//! `GET /user/id/{id}` runs every stage of the pipeline:
//!
//! - [`SecretExtender`] puts a server secret into the [`SampleContext`]
//! - [`UserIdModel`] parses `{id}` as an integer and picks up the secret
//! - [`UserIdValidator`] rejects negative ids
//! - [`UserIdProcessor`] knows exactly one user
//! - [`JsonWriter`] encodes the result
//!
//! The binary serves this router; the integration tests use it as their
//! fixture.

use crate::context::Require;
use crate::error::{HttpError, RouteError};
use crate::pipeline::{Extender, Processor, RequestModel, Validator};
use crate::request::Request;
use crate::router::Router;
use crate::stages::JsonWriter;
use http::Method;
use serde::Serialize;

pub const USER_ROUTE: &str = "/user/id/{id}";

#[derive(Debug, Default, Clone)]
pub struct SampleContext {
    pub secret: Option<String>,
}

pub struct SecretExtender {
    secret: String,
}

impl SecretExtender {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Extender<SampleContext> for SecretExtender {
    fn extend(&self, req: &mut Request<SampleContext>) {
        req.context.secret = Some(self.secret.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdGet {
    pub id: i64,
    pub secret: String,
}

/// Extracts `{id}` from the path.
pub struct UserIdModel;

impl RequestModel<SampleContext> for UserIdModel {
    type Model = UserIdGet;

    fn from_request(&self, req: &Request<SampleContext>) -> Result<UserIdGet, HttpError> {
        let id = req
            .require_path_param("id")?
            .parse::<i64>()
            .map_err(|e| HttpError::from_source(e, 400))?;
        let secret = req.context.secret.require("secret")?.clone();
        Ok(UserIdGet { id, secret })
    }
}

/// Ids must not be negative.
pub struct UserIdValidator;

impl Validator<UserIdGet> for UserIdValidator {
    fn validate(&self, model: &UserIdGet) -> Result<(), HttpError> {
        if model.id < 0 {
            return Err(HttpError::bad_request("Please enter a valid user id."));
        }
        Ok(())
    }
}

pub struct UserIdProcessor;

impl Processor<UserIdGet> for UserIdProcessor {
    type Output = User;

    fn process(&self, model: UserIdGet) -> Result<User, HttpError> {
        if model.id != 1 {
            return Err(HttpError::not_found("User not found!"));
        }
        Ok(User {
            id: 1,
            name: "Joe".to_string(),
            email: "joe@example.com".to_string(),
            secret: model.secret,
        })
    }
}

/// Router with the user route registered.
///
/// # Errors
///
/// Only if route registration fails, which it does not for this fixed table.
pub fn build_router(secret: &str) -> Result<Router<SampleContext>, RouteError> {
    let mut router = Router::with_context();
    router
        .add_route(USER_ROUTE)
        .methods([Method::GET])
        .extender(SecretExtender::new(secret))
        .model(UserIdModel)
        .validator(UserIdValidator)
        .processor(UserIdProcessor)
        .writer(JsonWriter)
        .register()?;
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn get(router: &Router<SampleContext>, path: &str) -> (u16, String) {
        let res = router.dispatch(Request::new(Method::GET, path));
        (res.status, res.body_text())
    }

    #[test]
    fn test_known_user() {
        let router = build_router("s3cr3tstr!ng").unwrap();
        let (status, body) = get(&router, "/user/id/1");
        assert_eq!(status, 200);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            json!({"Id": 1, "Name": "Joe", "Email": "joe@example.com", "Secret": "s3cr3tstr!ng"})
        );
    }

    #[test]
    fn test_negative_id_fails_validation() {
        let router = build_router("x").unwrap();
        assert_eq!(
            get(&router, "/user/id/-1"),
            (400, "Please enter a valid user id.".to_string())
        );
    }

    #[test]
    fn test_unknown_user() {
        let router = build_router("x").unwrap();
        assert_eq!(get(&router, "/user/id/2"), (404, "User not found!".to_string()));
    }

    #[test]
    fn test_encoded_id_is_decoded_before_parsing() {
        let router = build_router("x").unwrap();
        assert_eq!(get(&router, "/user/id/%31").0, 200);
        assert_eq!(
            get(&router, "/user/id/%2D1"),
            (400, "Please enter a valid user id.".to_string())
        );
    }

    #[test]
    fn test_non_numeric_id_fails_in_model() {
        let router = build_router("x").unwrap();
        let (status, body) = get(&router, "/user/id/abc");
        assert_eq!(status, 400);
        assert_eq!(body, "abc".parse::<i64>().unwrap_err().to_string());
    }

    #[test]
    fn test_model_without_extender_reports_missing_secret() {
        let mut router = Router::<SampleContext>::with_context();
        router
            .add_route(USER_ROUTE)
            .model(UserIdModel)
            .register()
            .unwrap();
        assert_eq!(
            get(&router, "/user/id/1"),
            (500, "missing context value: secret".to_string())
        );
    }
}
