use rust_api_contract::*;
use test_utils::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Concurrency tests: one populated runner shared read-only across tasks

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_high_concurrency_validation() {
    init_logging();
    let runner = Arc::new(create_products_runner());
    let service = Arc::new(ProductsService::new());

    let success_count = Arc::new(AtomicUsize::new(0));
    let mismatch_count = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for i in 0..100 {
        let runner = runner.clone();
        let service = service.clone();
        let success_count = success_count.clone();
        let mismatch_count = mismatch_count.clone();

        tasks.push(tokio::spawn(async move {
            // Every third request omits the required page number
            let uri = if i % 3 == 0 {
                "/api/products".to_string()
            } else {
                format!("/api/products?pageNo={}", i)
            };

            match runner.test("v1", "200", HttpRequest::get(&uri), service.as_ref()).await {
                Ok(_) => success_count.fetch_add(1, Ordering::SeqCst),
                Err(e) if e.is_contract_mismatch() => mismatch_count.fetch_add(1, Ordering::SeqCst),
                Err(e) => panic!("unexpected error: {}", e),
            };
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(mismatch_count.load(Ordering::SeqCst), 34);
    assert_eq!(success_count.load(Ordering::SeqCst), 66);
    assert_eq!(service.handled_count(), 66, "Invalid requests must never be dispatched");
}

#[tokio::test]
async fn test_concurrent_mixed_operations_with_join_all() {
    init_logging();
    let runner = create_products_runner();
    let service = ProductsService::new();

    let scenarios = vec![
        ("201", HttpRequest::post("/api/products").with_json_body(&json!({ "name": "foo" }))),
        ("400", HttpRequest::post("/api/products").with_json_body(&json!({}))),
        ("200", HttpRequest::get("/api/products?pageNo=2")),
        ("200", HttpRequest::get("/api/products/1")),
        ("404", HttpRequest::get("/api/products/0")),
        ("204", HttpRequest::put("/api/products/1").with_json_body(&json!({ "name": "bar" }))),
        ("204", HttpRequest::delete("/api/products/1")),
        ("404", HttpRequest::delete("/api/products/0")),
    ];
    let expected = scenarios.len();

    let results = futures::future::join_all(
        scenarios
            .into_iter()
            .map(|(status, request)| runner.test("v1", status, request, &service)),
    )
    .await;

    for result in &results {
        assert!(result.is_ok(), "scenario failed: {:?}", result);
    }
    assert_eq!(service.handled_count(), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_outcomes_are_stable() {
    init_logging();
    let runner = Arc::new(create_products_runner());
    let service = Arc::new(StubHttpClient::new(
        HttpResponse::new(200).with_json_body(&json!([{ "id": "wrong", "name": "Test product" }])),
    ));

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let runner = runner.clone();
            let service = service.clone();
            tokio::spawn(async move {
                runner
                    .test("v1", "200", HttpRequest::get("/api/products?pageNo=1"), service.as_ref())
                    .await
                    .unwrap_err()
                    .to_string()
            })
        })
        .collect();

    let messages: Vec<String> = futures::future::try_join_all(handles).await.unwrap();

    assert!(messages.iter().all(|m| m == &messages[0]));
    assert_eq!(
        messages[0],
        "Response does not match spec. $[0].id: expected number but found string"
    );
}
