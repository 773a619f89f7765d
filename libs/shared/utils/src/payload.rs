use axum::extract::{FromRequest, FromRequestParts};

use shared_models::error::AppError;

/// JSON body whose rejections render as an `AppError` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Query string counterpart of [`JsonBody`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::{body::Body, http::Request};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Booking {
        fees: f64,
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_accepts_typed_payload() {
        let JsonBody(booking) = JsonBody::<Booking>::from_request(json_request(r#"{"fees":250}"#), &())
            .await
            .unwrap();
        assert_eq!(booking.fees, 250.0);
    }

    #[tokio::test]
    async fn test_json_body_mistyped_field_is_bad_request() {
        let err = JsonBody::<Booking>::from_request(json_request(r#"{"fees":"abc"}"#), &())
            .await
            .unwrap_err();
        assert_matches!(err, AppError::BadRequest(msg) if msg.contains("fees"));
    }

    #[tokio::test]
    async fn test_json_body_without_content_type_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"fees":250}"#))
            .unwrap();
        let err = JsonBody::<Booking>::from_request(request, &()).await.unwrap_err();
        assert_matches!(err, AppError::BadRequest(_));
    }

    #[tokio::test]
    async fn test_query_params_mistyped_value_is_bad_request() {
        let (mut parts, _) = Request::builder().uri("/?fees=abc").body(()).unwrap().into_parts();
        let err = QueryParams::<Booking>::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_matches!(err, AppError::BadRequest(_));

        let (mut parts, _) = Request::builder().uri("/?fees=99.5").body(()).unwrap().into_parts();
        let QueryParams(booking) = QueryParams::<Booking>::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(booking.fees, 99.5);
    }
}
