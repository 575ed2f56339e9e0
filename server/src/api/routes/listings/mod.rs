//! Listing API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::{ApiJson, ApiQuery, ListingPath};
use crate::api::types::{ApiError, ErrorBody};
use crate::domain::{ListingInput, ListingQuery, ListingService};

use types::ListingDto;

/// Shared state for Listings API endpoints
#[derive(Clone)]
pub struct ListingsApiState {
    pub listings: ListingService,
}

/// Build Listings API routes
pub fn routes(listings: ListingService) -> Router<()> {
    let state = ListingsApiState { listings };

    Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route(
            "/{id}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .with_state(state)
}

/// List listings matching the filters, ordered by id
///
/// Each numeric filter needs its operand; an operand without a value is ignored.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    tag = "listings",
    params(ListingQuery),
    responses(
        (status = 200, description = "Page of listings", body = Vec<ListingDto>),
        (status = 400, description = "Invalid filter or pagination", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn list_listings(
    State(state): State<ListingsApiState>,
    ApiQuery(query): ApiQuery<ListingQuery>,
) -> Result<Json<Vec<ListingDto>>, ApiError> {
    let rows = state.listings.list(&query).await?;
    Ok(Json(rows.into_iter().map(ListingDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    tag = "listings",
    params(("id" = i64, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing", body = ListingDto),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    State(state): State<ListingsApiState>,
    path: ListingPath,
) -> Result<Json<ListingDto>, ApiError> {
    let row = state.listings.get_by_id(path.id).await?;
    Ok(Json(row.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/listings",
    tag = "listings",
    request_body = ListingInput,
    responses(
        (status = 201, description = "Listing created", body = ListingDto),
        (status = 400, description = "Invalid listing", body = ErrorBody)
    )
)]
pub async fn create_listing(
    State(state): State<ListingsApiState>,
    ApiJson(body): ApiJson<ListingInput>,
) -> Result<(StatusCode, Json<ListingDto>), ApiError> {
    let row = state.listings.create(&body).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Update the supplied fields; `"type": null` clears the category
#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    tag = "listings",
    params(("id" = i64, Path, description = "Listing ID")),
    request_body = ListingInput,
    responses(
        (status = 200, description = "Listing updated", body = ListingDto),
        (status = 400, description = "Invalid listing", body = ErrorBody),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn update_listing(
    State(state): State<ListingsApiState>,
    path: ListingPath,
    ApiJson(body): ApiJson<ListingInput>,
) -> Result<Json<ListingDto>, ApiError> {
    let row = state.listings.update(path.id, &body).await?;
    Ok(Json(row.into()))
}

/// Delete a listing; deleting a missing id also succeeds
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    tag = "listings",
    params(("id" = i64, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Listing deleted or already absent"),
        (status = 400, description = "Invalid id", body = ErrorBody)
    )
)]
pub async fn delete_listing(
    State(state): State<ListingsApiState>,
    path: ListingPath,
) -> Result<StatusCode, ApiError> {
    state.listings.delete_by_id(path.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::data::{ListingRepository, SqliteService};

    async fn app() -> Router {
        let repo: Arc<dyn ListingRepository> = Arc::new(SqliteService::in_memory().await);
        Router::new().nest("/api/v1/listings", routes(ListingService::new(repo, None)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(app: &Router, body: Value) -> Value {
        let (status, json) = send(app, Method::POST, "/api/v1/listings", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json
    }

    fn listing(address: &str, price: f64, bedrooms: i64, category: Option<&str>) -> Value {
        json!({
            "address": address,
            "price": price,
            "bedrooms": bedrooms,
            "bathrooms": 1,
            "type": category
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let app = app().await;
        let created = create(&app, listing("12 Harbour Rd", 425000.0, 3, Some("Townhouse"))).await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["type"], "Townhouse");

        let (status, fetched) = send(&app, Method::GET, "/api/v1/listings/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_validation_error() {
        let app = app().await;
        let (status, json) = send(
            &app,
            Method::POST,
            "/api/v1/listings",
            Some(json!({"address": "", "price": "5", "bedrooms": 1, "bathrooms": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");
        assert_eq!(json["code"], "VALIDATION_ERROR");
        let violations = json["violations"].as_array().unwrap();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0]["field"], "address");
        assert_eq!(violations[0]["constraint"], "required");
        assert_eq!(violations[1]["field"], "price");
        assert_eq!(violations[1]["constraint"], "numeric");
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/listings")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "JSON_PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_get_missing_is_empty_404() {
        let app = app().await;
        let (status, json) = send(&app, Method::GET, "/api/v1/listings/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let app = app().await;
        for uri in ["/api/v1/listings/abc", "/api/v1/listings/0", "/api/v1/listings/-3"] {
            let (status, json) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["code"], "INVALID_LISTING_ID");
        }
    }

    #[tokio::test]
    async fn test_update_partial() {
        let app = app().await;
        create(&app, listing("1 Main St", 100.0, 2, Some("Condominium"))).await;

        let (status, json) = send(
            &app,
            Method::PUT,
            "/api/v1/listings/1",
            Some(json!({"address": "X"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["address"], "X");
        assert_eq!(json["price"], 100.0);
        assert_eq!(json["bedrooms"], 2);
        assert_eq!(json["type"], "Condominium");

        let (_, cleared) = send(
            &app,
            Method::PUT,
            "/api/v1/listings/1",
            Some(json!({"type": null})),
        )
        .await;
        assert_eq!(cleared["type"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_missing_is_404() {
        let app = app().await;
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/listings/5",
            Some(json!({"price": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let app = app().await;
        create(&app, listing("1 Main St", 100.0, 2, None)).await;

        let (status, _) = send(&app, Method::DELETE, "/api/v1/listings/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, "/api/v1/listings/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, "/api/v1/listings/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let app = app().await;
        for i in 1..=12 {
            let category = if i % 2 == 0 { "Condominium" } else { "Townhouse" };
            create(
                &app,
                listing(&format!("{} Ocean Ave", i), i as f64 * 100.0, i % 4, Some(category)),
            )
            .await;
        }

        let (status, json) = send(&app, Method::GET, "/api/v1/listings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 10);

        let (_, json) = send(
            &app,
            Method::GET,
            "/api/v1/listings?page=2&pageSize=5",
            None,
        )
        .await;
        let ids: Vec<i64> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10]);

        let (_, json) = send(
            &app,
            Method::GET,
            "/api/v1/listings?price=600&priceOperand=%3E&type=Condominium&address=ocean",
            None,
        )
        .await;
        let ids: Vec<i64> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![8, 10, 12]);
    }

    #[tokio::test]
    async fn test_list_price_without_operand() {
        let app = app().await;
        let (status, json) = send(&app, Method::GET, "/api/v1/listings?price=100", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["violations"][0]["field"], "priceOperand");
        assert_eq!(json["violations"][0]["constraint"], "required");
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_operator() {
        let app = app().await;
        let (status, json) = send(
            &app,
            Method::GET,
            "/api/v1/listings?bedrooms=2&bedroomsOperand=%21%3D",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["violations"][0]["field"], "bedroomsOperand");
        assert_eq!(json["violations"][0]["constraint"], "membership");
    }

    #[tokio::test]
    async fn test_list_duplicate_param_is_parse_error() {
        let app = app().await;
        let (status, json) = send(&app, Method::GET, "/api/v1/listings?page=1&page=2", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "QUERY_PARSE_ERROR");
    }
}
