use rust_api_contract::*;
use test_utils::*;

/// Products API tests against the in-memory products service

#[tokio::test]
async fn test_post_products_returns_400_if_content_is_invalid() {
    init_logging();
    let runner = create_products_runner();
    let service = ProductsService::new();

    let request = HttpRequest::post("/api/products").with_json_body(&json!({}));
    runner.test("v1", "400", request, &service).await.unwrap();

    assert_eq!(service.handled_count(), 1);
}

#[tokio::test]
async fn test_post_products_returns_201_if_content_is_valid() {
    init_logging();
    let runner = create_products_runner();

    let request = HttpRequest::post("/api/products").with_json_body(&json!({ "name": "foo" }));
    let response = runner.test("v1", "201", request, &ProductsService::new()).await.unwrap();

    assert_eq!(response.headers.get("Location"), Some("api/products/1".to_string()));
}

#[tokio::test]
async fn test_get_products_returns_400_if_required_parameters_are_not_provided() {
    init_logging();
    let runner = create_products_runner();

    runner
        .test("v1", "400", HttpRequest::get("/api/products"), &ProductsService::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_products_returns_200_if_required_parameters_are_provided() {
    init_logging();
    let runner = create_products_runner();

    let response = runner
        .test("v1", "200", HttpRequest::get("/api/products?pageNo=1"), &ProductsService::new())
        .await
        .unwrap();

    assert_eq!(
        response.body.unwrap().parse_json().unwrap(),
        json!([{ "id": 1, "name": "Test product" }])
    );
}

#[tokio::test]
async fn test_get_product_returns_404_if_unknown_id_is_provided() {
    init_logging();
    let runner = create_products_runner();

    runner
        .test("v1", "404", HttpRequest::get("/api/products/0"), &ProductsService::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_product_returns_200_if_known_id_is_provided() {
    init_logging();
    let runner = create_products_runner();

    runner
        .test("v1", "200", HttpRequest::get("/api/products/1"), &ProductsService::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_product_returns_404_if_unknown_id_is_provided() {
    init_logging();
    let runner = create_products_runner();

    let request = HttpRequest::put("/api/products/0").with_body(HttpBody::text("application/json", ""));
    runner.test("v1", "404", request, &ProductsService::new()).await.unwrap();
}

#[tokio::test]
async fn test_put_product_returns_400_if_content_is_invalid() {
    init_logging();
    let runner = create_products_runner();

    let request = HttpRequest::put("/api/products/1").with_json_body(&json!({}));
    runner.test("v1", "400", request, &ProductsService::new()).await.unwrap();
}

#[tokio::test]
async fn test_put_product_returns_204_if_known_id_is_provided_and_content_is_valid() {
    init_logging();
    let runner = create_products_runner();

    let request = HttpRequest::put("/api/products/1").with_json_body(&json!({ "name": "foo" }));
    runner.test("v1", "204", request, &ProductsService::new()).await.unwrap();
}

#[tokio::test]
async fn test_delete_product_returns_404_if_unknown_id_is_provided() {
    init_logging();
    let runner = create_products_runner();

    runner
        .test("v1", "404", HttpRequest::delete("/api/products/0"), &ProductsService::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_product_returns_204_if_known_id_is_provided() {
    init_logging();
    let runner = create_products_runner();

    runner
        .test("v1", "204", HttpRequest::delete("/api/products/1"), &ProductsService::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_page_number_fails_before_dispatch() {
    init_logging();
    let runner = create_products_runner();
    let service = ProductsService::new();

    let error = runner
        .test("v1", "200", HttpRequest::get("/api/products"), &service)
        .await
        .unwrap_err();

    assert_eq!(service.handled_count(), 0);
    assert_eq!(
        error.violations()[0].kind,
        ViolationKind::MissingRequiredParameter { name: "pageNo".to_string() }
    );
}

#[tokio::test]
async fn test_non_numeric_page_number_fails_before_dispatch() {
    init_logging();
    let runner = create_products_runner();
    let service = ProductsService::new();

    let error = runner
        .test("v1", "200", HttpRequest::get("/api/products?pageNo=first&pageSize=10"), &service)
        .await
        .unwrap_err();

    assert_eq!(service.handled_count(), 0);
    assert_eq!(
        error.to_string(),
        "Request does not match spec. Parameter 'pageNo' is not of type 'number'"
    );
}

#[tokio::test]
async fn test_posting_empty_product_with_success_expectation_fails() {
    init_logging();
    let runner = create_products_runner();
    let service = ProductsService::new();

    let request = HttpRequest::post("/api/products").with_json_body(&json!({}));
    let error = runner.test("v1", "201", request, &service).await.unwrap_err();

    assert_eq!(service.handled_count(), 0);
    assert_eq!(error.violations().len(), 1);
    assert_eq!(error.violations()[0].location, "$.name");
}

#[tokio::test]
async fn test_expecting_success_for_unknown_product_reports_status_mismatch() {
    init_logging();
    let runner = create_products_runner();

    let error = runner
        .test("v1", "200", HttpRequest::get("/api/products/0"), &ProductsService::new())
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Status code '404' does not match expected value '200'");
}

#[tokio::test]
async fn test_undescribed_method_is_spec_not_found() {
    init_logging();
    let runner = create_products_runner();

    let error = runner
        .test("v1", "200", HttpRequest::new(HttpMethod::Patch, "/api/products/1"), &ProductsService::new())
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Spec. not provided for URI '/api/products/1', method 'PATCH' and status code '200'"
    );
}
