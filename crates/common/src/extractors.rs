//! Request extractors shared by the domain routers

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::Error;

/// `Json<T>` followed by `T::validate()`.
///
/// Unparseable bodies and failed field rules are both rejected with
/// [`Error::Validation`], so every input problem answers 400 with the
/// common error body.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value
            .validate()
            .map_err(|errors| Error::Validation(describe(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> Error {
    tracing::debug!(status = %rejection.status(), "Rejected request body");
    Error::Validation(rejection.body_text())
}

/// Flatten field errors into `field: rule` pairs, sorted by field name
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let rules: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
            format!("{}: {}", field, rules.join(", "))
        })
        .collect();
    fields.sort();

    format!("Invalid fields: {}", fields.join("; "))
}
