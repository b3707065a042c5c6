use std::ops::Deref;

use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum::{Form, Json, RequestPartsExt};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use validator::{Validate, ValidationErrors};

/// Query string parameters that passed `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQueryParams<T>(pub T);

/// Form-encoded parameters that passed `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedForm<T>(pub T);

fn map_query_rejection(err: QueryRejection) -> Response {
    (
        err.status(),
        Json(json!({
            "message": format!("Failed to parse query string: {}", err.body_text())
        })),
    )
        .into_response()
}

fn map_form_rejection(err: FormRejection) -> Response {
    (
        err.status(),
        Json(json!({
            "message": format!("Failed to parse form: {}", err.body_text())
        })),
    )
        .into_response()
}

fn validated<T: Validate>(value: T) -> Result<T, Response> {
    value.validate().map(|_| value).map_err(validation_response)
}

fn validation_response(err: ValidationErrors) -> Response {
    debug!("Rejecting request parameters: {}", err);
    (StatusCode::BAD_REQUEST, Json(err)).into_response()
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQueryParams<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = parts
            .extract::<Query<T>>()
            .await
            .map_err(map_query_rejection)?;
        validated(query).map(ValidatedQueryParams)
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(form) = Form::<T>::from_request(req, state)
            .await
            .map_err(map_form_rejection)?;
        validated(form).map(ValidatedForm)
    }
}

impl<T> Deref for ValidatedQueryParams<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Deref for ValidatedForm<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::header::CONTENT_TYPE,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::paginator::{PageRequest, Paginator};

    async fn query(uri: &str) -> Result<PageRequest, Response> {
        let (mut parts, _) = axum::http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        ValidatedQueryParams::<PageRequest>::from_request_parts(&mut parts, &())
            .await
            .map(|ValidatedQueryParams(r)| r)
    }

    async fn form(body: &'static str) -> Result<PageRequest, Response> {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/accounts/search")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        ValidatedForm::<PageRequest>::from_request(req, &())
            .await
            .map(|ValidatedForm(r)| r)
    }

    async fn json_body(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn query_string_is_parsed() {
        // Act
        let r = query("/accounts?limit=5&page=2&sort=desc&order=name").await;

        // Assert
        let Ok(r) = r else {
            panic!("request was rejected")
        };
        assert_eq!(
            r,
            PageRequest::builder()
                .limit(5)
                .page(2)
                .sort("desc")
                .order("name")
                .build()
        );
    }

    #[tokio::test]
    async fn empty_query_string_gives_defaults_after_normalization() {
        let Ok(r) = query("/accounts").await else {
            panic!("request was rejected")
        };
        let mut p: Paginator<()> = r.into();

        p.set_total(0);

        assert_eq!(p.order_expression(), "id asc");
        assert_eq!(p.limit(), 10);
    }

    #[tokio::test]
    async fn malformed_number_is_rejected() {
        let Err(resp) = query("/accounts?limit=ten").await else {
            panic!("request was accepted")
        };

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Failed to parse query string: "), "{message}");
    }

    #[tokio::test]
    async fn unsafe_order_column_is_rejected() {
        let Err(resp) = query("/accounts?order=id%3Bdrop").await else {
            panic!("request was accepted")
        };

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["order"][0]["code"], "regex");
        assert!(body.get("sort").is_none());
    }

    #[tokio::test]
    async fn unknown_sort_direction_is_rejected() {
        let Err(resp) = query("/accounts?sort=sideways").await else {
            panic!("request was accepted")
        };

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["sort"][0]["code"], "regex");
        assert!(body.get("order").is_none());
    }

    #[tokio::test]
    async fn form_body_is_parsed() {
        let Ok(r) = form("limit=20&page=3").await else {
            panic!("request was rejected")
        };

        assert_eq!(r.limit, 20);
        assert_eq!(r.page, 3);
        assert_eq!(r.sort, "");
    }

    #[tokio::test]
    async fn malformed_form_is_rejected() {
        let Err(resp) = form("page=third").await else {
            panic!("request was accepted")
        };

        assert!(resp.status().is_client_error());
        let body = json_body(resp).await;
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Failed to parse form: "), "{message}");
    }

    #[tokio::test]
    async fn qualified_order_column_is_accepted() {
        let Ok(r) = query("/accounts?order=account.name&sort=desc").await else {
            panic!("request was rejected")
        };

        assert_eq!(r.order, "account.name");
    }

    #[tokio::test]
    async fn invalid_form_is_rejected() {
        let Err(resp) = form("sort=up").await else {
            panic!("request was accepted")
        };

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert!(body.get("sort").is_some(), "{body}");
    }
}
