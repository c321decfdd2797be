//! REST API endpoints for the TradeGateway
//!
//! This module provides the trade calculation endpoint, read-only catalog
//! lookups and a health check.

use crate::error::{GatewayError, GatewayResult};
use crate::messages::{
    CalculateTradeRequest, CalculateTradeResponse, ErrorResponse, ItemResponse, ItemsQuery,
    SkippedItems, StockResponse, ValidatedTradeRequest,
};
use item_catalog::ItemCatalog;
use std::convert::Infallible;
use std::sync::Arc;
use trade_engine::{
    FairnessClassifier, TradeEvaluation, TradeOffer, TradeSession, UnresolvedPolicy,
};
use warp::http::StatusCode;
use warp::Filter;

/// Rejection carrying a ready-made error body
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl warp::reject::Reject for ApiError {}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let (status, code) = match &err {
            GatewayError::Catalog(item_catalog::CatalogError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND")
            }
            e if e.is_client_error() => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError { status, body: ErrorResponse::new(code, err.to_string()) }
    }
}

/// Price both sides of a validated request and classify the result
///
/// Unknown item names are left out of the totals and listed in `skipped`.
pub fn evaluate_trade(
    request: &ValidatedTradeRequest,
    catalog: &ItemCatalog,
    classifier: &FairnessClassifier,
) -> GatewayResult<CalculateTradeResponse> {
    let mode = request.mode();
    let yours =
        TradeOffer::from_names(request.your_items(), mode, catalog, UnresolvedPolicy::Skip)?;
    let theirs =
        TradeOffer::from_names(request.their_items(), mode, catalog, UnresolvedPolicy::Skip)?;

    let session = TradeSession::from_offers(yours.offer, theirs.offer, mode);
    let TradeEvaluation { your_total, their_total, verdict } = session.evaluate(classifier);

    Ok(CalculateTradeResponse {
        your_total,
        their_total,
        difference: verdict.difference,
        percentage: verdict.percentage,
        verdict: verdict.label,
        your_share: verdict.your_share,
        their_share: verdict.their_share,
        mode,
        skipped: SkippedItems { yours: yours.skipped, theirs: theirs.skipped },
    })
}

/// Calculate a trade
pub async fn calculate_trade(
    request: CalculateTradeRequest,
    catalog: Arc<ItemCatalog>,
    classifier: Arc<FairnessClassifier>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let validated = request.validate().map_err(|e| {
        tracing::warn!("Rejected trade request: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    let response = evaluate_trade(&validated, &catalog, &classifier)
        .map_err(|e| warp::reject::custom(ApiError::from(e)))?;

    tracing::debug!(
        "Trade {} vs {} ({}): {}",
        response.your_total,
        response.their_total,
        response.mode,
        response.verdict
    );

    Ok(warp::reply::json(&response))
}

/// List catalog items, highest standard value first
pub async fn list_items(
    query: ItemsQuery,
    catalog: Arc<ItemCatalog>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let matches = match &query.q {
        Some(q) => catalog.search_items(q),
        None => catalog.top_items(catalog.len()),
    };
    let mut items: Vec<ItemResponse> = matches.into_iter().map(ItemResponse::from).collect();

    if let Some(limit) = query.limit {
        items.truncate(limit);
    }

    Ok(warp::reply::json(&items))
}

/// List items currently in stock
pub async fn list_stock(catalog: Arc<ItemCatalog>) -> Result<impl warp::Reply, warp::Rejection> {
    let in_stock = catalog.in_stock().into_iter().map(ItemResponse::from).collect();
    Ok(warp::reply::json(&StockResponse { in_stock }))
}

/// Get a single catalog item by name
pub async fn get_item(
    raw_name: String,
    catalog: Arc<ItemCatalog>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let name = urlencoding::decode(&raw_name)
        .map_err(|_| {
            warp::reject::custom(ApiError::from(GatewayError::Validation(format!(
                "item name '{raw_name}' is not valid UTF-8"
            ))))
        })?
        .into_owned();

    match catalog.get_by_name(&name) {
        Ok(item) => Ok(warp::reply::json(&ItemResponse::from(item))),
        Err(e) => {
            let mut error = ApiError::from(GatewayError::from(e));
            error.body = error.body.with_details(serde_json::json!({ "name": name }));
            Err(warp::reject::custom(error))
        }
    }
}

/// Turn rejections into JSON error responses
pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorResponse::new("NOT_FOUND", "No such endpoint"))
    } else if let Some(api) = err.find::<ApiError>() {
        (api.status, api.body.clone())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, ErrorResponse::new("INVALID_REQUEST", e.to_string()))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, ErrorResponse::new("INVALID_REQUEST", "Body too large"))
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorResponse::new("INVALID_REQUEST", "Expected application/json"),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new("METHOD_NOT_ALLOWED", "Method not allowed"),
        )
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new("INTERNAL_ERROR", "Internal error"))
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

/// Create all REST API routes
pub fn create_routes(
    catalog: Arc<ItemCatalog>,
    classifier: Arc<FairnessClassifier>,
    max_body_bytes: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let catalog_filter = warp::any().map(move || catalog.clone());
    let classifier_filter = warp::any().map(move || classifier.clone());

    // Trade calculation endpoint
    let calculate = warp::path!("trade" / "calculate")
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(warp::body::json())
        .and(catalog_filter.clone())
        .and(classifier_filter)
        .and_then(calculate_trade);

    // Catalog listing endpoint
    let items = warp::path!("api" / "items")
        .and(warp::get())
        .and(warp::query::<ItemsQuery>())
        .and(catalog_filter.clone())
        .and_then(list_items);

    // Stock endpoint
    let stock = warp::path!("api" / "stock")
        .and(warp::get())
        .and(catalog_filter.clone())
        .and_then(list_stock);

    // Single item endpoint
    let item = warp::path!("api" / "items" / String)
        .and(warp::get())
        .and(catalog_filter)
        .and_then(get_item);

    // Health check endpoint
    let health = warp::path("health").and(warp::path::end()).and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    });

    calculate
        .or(items)
        .or(item)
        .or(stock)
        .or(health)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "OPTIONS"]),
        )
        .recover(handle_rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_catalog::CatalogItem;
    use serde_json::Value;
    use trade_engine::ClassifierConfig;

    fn test_catalog() -> Arc<ItemCatalog> {
        Arc::new(
            ItemCatalog::from_items(vec![
                CatalogItem::new("West Dragon", 1_000_000_000, 2_300_000_000),
                CatalogItem::new("Kitsune", 215_000_000, 1_800_000_000),
                CatalogItem::new("Yeti", 140_000_000, 280_000_000).with_in_stock(true),
                CatalogItem::new("Gas", 80_000_000, 1_100_000_000),
                CatalogItem::new("Dough", 30_000_000, 1_000_000_000).with_in_stock(true),
            ])
            .unwrap(),
        )
    }

    fn routes() -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
        create_routes(test_catalog(), Arc::new(FairnessClassifier::default()), 16 * 1024)
    }

    async fn post_trade(body: Value) -> (StatusCode, Value) {
        let response = warp::test::request()
            .method("POST")
            .path("/trade/calculate")
            .json(&body)
            .reply(&routes())
            .await;
        let json = serde_json::from_slice(response.body()).unwrap();
        (response.status(), json)
    }

    #[tokio::test]
    async fn test_calculate_trade() {
        let (status, body) = post_trade(serde_json::json!({
            "yourItems": ["Kitsune"],
            "theirItems": ["Yeti", "Gas"],
            "mode": "standard"
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["yourTotal"], 215_000_000);
        assert_eq!(body["theirTotal"], 220_000_000);
        assert_eq!(body["difference"], 5_000_000);
        assert_eq!(body["verdict"], "FAIR");
        assert_eq!(body["mode"], "standard");
    }

    #[tokio::test]
    async fn test_calculate_trade_permanent_mode() {
        let (status, body) = post_trade(serde_json::json!({
            "yourItems": ["Dough"],
            "theirItems": ["Yeti"],
            "mode": "permanent"
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["yourTotal"], 1_000_000_000);
        assert_eq!(body["theirTotal"], 280_000_000);
        assert_eq!(body["difference"], -720_000_000);
        assert_eq!(body["verdict"], "HUGE_LOSS");
    }

    #[tokio::test]
    async fn test_empty_trade_is_neutral() {
        let (status, body) = post_trade(serde_json::json!({
            "yourItems": [],
            "theirItems": [],
            "mode": "standard"
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verdict"], "NEUTRAL");
        assert_eq!(body["percentage"], 0.0);
        assert_eq!(body["yourShare"], 50.0);
    }

    #[tokio::test]
    async fn test_unknown_items_are_skipped() {
        let (status, body) = post_trade(serde_json::json!({
            "yourItems": ["Kitsune", "Mystery Box"],
            "theirItems": ["Kitsune"],
            "mode": "standard"
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["yourTotal"], 215_000_000);
        assert_eq!(body["verdict"], "FAIR");
        assert_eq!(body["skipped"]["yours"], serde_json::json!(["Mystery Box"]));
        assert_eq!(body["skipped"]["theirs"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_rejects_five_items() {
        let (status, body) = post_trade(serde_json::json!({
            "yourItems": ["West Dragon", "Kitsune", "Yeti", "Gas", "Dough"],
            "theirItems": [],
            "mode": "standard"
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_rejects_duplicates() {
        let (status, _) = post_trade(serde_json::json!({
            "yourItems": [],
            "theirItems": ["Gas", "Gas"],
            "mode": "standard"
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_bad_mode() {
        let (status, body) = post_trade(serde_json::json!({
            "yourItems": [],
            "theirItems": [],
            "mode": "regular"
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("regular"));
    }

    #[tokio::test]
    async fn test_rejects_malformed_body() {
        let (status, body) = post_trade(serde_json::json!({
            "yourItems": "Kitsune",
            "mode": "standard"
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_list_items() {
        let response = warp::test::request().path("/api/items?limit=2").reply(&routes()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(response.body()).unwrap();
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "West Dragon");
        assert_eq!(items[0]["standardDisplay"], "1B");
        assert_eq!(items[1]["name"], "Kitsune");
    }

    #[tokio::test]
    async fn test_search_items() {
        let response = warp::test::request().path("/api/items?q=dRaGoN").reply(&routes()).await;
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);

        // Matches come back highest value first, then the limit applies
        let response = warp::test::request().path("/api/items?q=A&limit=1").reply(&routes()).await;
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "West Dragon");
    }

    #[tokio::test]
    async fn test_stock_lists_only_in_stock_items() {
        let response = warp::test::request().path("/api/stock").reply(&routes()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(response.body()).unwrap();
        let names: Vec<&str> = body["inStock"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Yeti", "Dough"]);
        assert_eq!(body["inStock"][0]["inStock"], true);
    }

    #[tokio::test]
    async fn test_stock_rejects_post() {
        let response =
            warp::test::request().method("POST").path("/api/stock").reply(&routes()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_get_item_decodes_name() {
        let response =
            warp::test::request().path("/api/items/West%20Dragon").reply(&routes()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["permanentValue"], 2_300_000_000u64);
    }

    #[tokio::test]
    async fn test_get_missing_item() {
        let response = warp::test::request().path("/api/items/Nope").reply(&routes()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"]["code"], "ITEM_NOT_FOUND");
        assert_eq!(body["error"]["details"]["name"], "Nope");
    }

    #[tokio::test]
    async fn test_health_and_unknown_route() {
        let response = warp::test::request().path("/health").reply(&routes()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request().path("/nowhere").reply(&routes()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_evaluate_trade_honors_threshold_model() {
        let catalog = test_catalog();
        let request = CalculateTradeRequest {
            your_items: vec!["Yeti".to_string()],
            their_items: vec!["Gas".to_string()],
            mode: "standard".to_string(),
        }
        .validate()
        .unwrap();

        // 60M below a 140M side: a huge loss by default
        let default = evaluate_trade(&request, &catalog, &FairnessClassifier::default()).unwrap();
        assert_eq!(default.verdict, trade_engine::VerdictLabel::HugeLoss);

        // but just a loss under the fixed 100M cutoff
        let legacy = FairnessClassifier::new(ClassifierConfig::legacy_absolute());
        let response = evaluate_trade(&request, &catalog, &legacy).unwrap();
        assert_eq!(response.verdict, trade_engine::VerdictLabel::Loss);
    }
}
