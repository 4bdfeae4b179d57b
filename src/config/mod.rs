pub mod runner_config;

pub use runner_config::ApiTestRunnerConfig;
