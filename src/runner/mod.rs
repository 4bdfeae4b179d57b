pub mod api_test_runner;

pub use api_test_runner::ApiTestRunner;
