use rust_api_contract::*;
use test_utils::*;
use serde_json::Value;

/// Export and load tests for contract documents

#[tokio::test]
async fn test_export_writes_one_document_per_group() {
    init_logging();
    let output_root = tempfile::tempdir().unwrap();

    let registry = DocumentRegistry::new()
        .with_document("v1", create_product_catalog_document())
        .unwrap()
        .with_document("v2", ContractDocument::new("V2 API", "V2"))
        .unwrap();
    let mut runner = ApiTestRunner::new(registry, ApiTestRunnerConfig::publishing(output_root.path())).unwrap();
    describe_products(&mut runner);

    let written = runner.export_documents().await.unwrap();

    assert_eq!(
        written,
        vec![
            output_root.path().join("v1").join("openapi.json"),
            output_root.path().join("v2").join("openapi.json"),
        ]
    );

    let content = tokio::fs::read_to_string(&written[0]).await.unwrap();
    let exported: Value = serde_json::from_str(&content).unwrap();

    assert_eq!(exported["openapi"], "3.0.1");
    assert_eq!(exported["info"]["title"], "V1 API");
    assert_eq!(
        exported["paths"]["/api/products"]["get"]["parameters"][0],
        serde_json::json!({ "name": "pageNo", "in": "query", "required": true, "schema": { "type": "number" } })
    );
    assert_eq!(
        exported["paths"]["/api/products/{id}"]["put"]["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/product"
    );
    assert_eq!(exported["components"]["schemas"]["product"]["required"], serde_json::json!(["name"]));
}

#[tokio::test]
async fn test_exported_paths_keep_description_order() {
    init_logging();
    let output_root = tempfile::tempdir().unwrap();
    let mut runner = ApiTestRunner::new(
        DocumentRegistry::new()
            .with_document("v1", create_product_catalog_document())
            .unwrap(),
        ApiTestRunnerConfig::publishing(output_root.path()),
    )
    .unwrap();
    describe_products(&mut runner);

    let written = runner.export_documents().await.unwrap();
    let content = tokio::fs::read_to_string(&written[0]).await.unwrap();

    let collection = content.find("\"/api/products\"").unwrap();
    let item = content.find("\"/api/products/{id}\"").unwrap();
    assert!(collection < item);
}

#[tokio::test]
async fn test_export_requires_output_root() {
    init_logging();
    let config = ApiTestRunnerConfig::default().with_generate_contract_files(true);
    let runner = ApiTestRunner::new(DocumentRegistry::new(), config).unwrap();

    let error = runner.export_documents().await.unwrap_err();

    assert_eq!(
        error.to_string(),
        "Contract file generation enabled but no file output root configured"
    );
    assert_eq!(error.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_exported_document_drives_a_new_runner() {
    init_logging();
    let output_root = tempfile::tempdir().unwrap();
    let mut runner = ApiTestRunner::new(
        DocumentRegistry::new()
            .with_document("v1", create_product_catalog_document())
            .unwrap(),
        ApiTestRunnerConfig::publishing(output_root.path()).with_document_file_name("contract.json"),
    )
    .unwrap();
    describe_products(&mut runner);
    let written = runner.export_documents().await.unwrap();
    assert!(written[0].ends_with("v1/contract.json"));

    let reloaded = DocumentParser::from_file(&written[0]).await.unwrap();
    assert_eq!(&reloaded, runner.registry().get("v1").unwrap());

    let replay = create_runner(reloaded);
    let service = ProductsService::new();
    replay
        .test("v1", "200", HttpRequest::get("/api/products?pageNo=1"), &service)
        .await
        .unwrap();
    assert!(replay
        .test("v1", "200", HttpRequest::get("/api/products"), &service)
        .await
        .is_err());
}

#[tokio::test]
async fn test_load_hand_written_document() {
    init_logging();
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("orders.json");
    tokio::fs::write(
        &path,
        r##"{
            "openapi": "3.0.1",
            "info": { "title": "Orders", "version": "1" },
            "paths": {
                "/orders/{orderId}": {
                    "parameters": [ { "$ref": "#/components/parameters/orderId" } ],
                    "get": {
                        "responses": {
                            "200": {
                                "description": "Order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "required": ["lines"],
                                            "properties": {
                                                "lines": { "type": "array", "items": { "type": "integer", "minimum": 1 } }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "parameters": {
                    "orderId": { "name": "orderId", "in": "path", "required": true, "schema": { "type": "integer" } }
                }
            }
        }"##,
    )
    .await
    .unwrap();

    let document = DocumentParser::from_file(&path).await.unwrap();
    let runner = create_runner(document);

    let good = StubHttpClient::new(HttpResponse::new(200).with_json_body(&serde_json::json!({ "lines": [1, 2] })));
    runner.test("v1", "200", HttpRequest::get("/orders/12"), &good).await.unwrap();

    let error = runner
        .test("v1", "200", HttpRequest::get("/orders/twelve"), &good)
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Request does not match spec. Parameter 'orderId' is not of type 'integer'");

    let bad = StubHttpClient::new(HttpResponse::new(200).with_json_body(&serde_json::json!({ "lines": [0] })));
    let error = runner.test("v1", "200", HttpRequest::get("/orders/12"), &bad).await.unwrap_err();
    assert_eq!(error.violations()[0].location, "$.lines[0]");
}

#[tokio::test]
async fn test_load_rejects_malformed_documents() {
    init_logging();
    let directory = tempfile::tempdir().unwrap();

    let bad_status = directory.path().join("bad_status.json");
    tokio::fs::write(
        &bad_status,
        r#"{ "info": { "title": "x", "version": "1" }, "paths": { "/a": { "get": { "responses": { "2XX": { "description": "any" } } } } } }"#,
    )
    .await
    .unwrap();
    assert!(matches!(
        DocumentParser::from_file(&bad_status).await,
        Err(ContractError::InvalidDocument(_))
    ));

    let missing = directory.path().join("missing.json");
    assert!(matches!(
        DocumentParser::from_file(&missing).await,
        Err(ContractError::Io { .. })
    ));
}

#[tokio::test]
async fn test_export_follows_registration_order() {
    init_logging();
    let output_root = tempfile::tempdir().unwrap();
    let registry = DocumentRegistry::new()
        .with_document("v2", ContractDocument::new("V2 API", "V2"))
        .unwrap()
        .with_document("v1", create_product_catalog_document())
        .unwrap();
    let runner = ApiTestRunner::new(registry, ApiTestRunnerConfig::publishing(output_root.path())).unwrap();

    let written = runner.export_documents().await.unwrap();

    assert_eq!(
        written,
        vec![
            output_root.path().join("v2").join("openapi.json"),
            output_root.path().join("v1").join("openapi.json"),
        ]
    );
}

#[tokio::test]
async fn test_load_document_with_path_item_extensions() {
    init_logging();
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("extended.json");
    tokio::fs::write(
        &path,
        r#"{
            "info": { "title": "V1 API", "version": "V1" },
            "paths": {
                "/api/products": {
                    "x-owner": "catalog-team",
                    "servers": [ { "url": "http://localhost:5000" } ],
                    "get": { "responses": { "200": { "description": "OK" } } }
                }
            }
        }"#,
    )
    .await
    .unwrap();

    let runner = create_runner(DocumentParser::from_file(&path).await.unwrap());

    runner
        .test("v1", "200", HttpRequest::get("/api/products"), &StubHttpClient::ok())
        .await
        .unwrap();
}
