mod analytics;
mod generate;
mod health;
mod metrics;

pub use analytics::analytics_handler;
pub use generate::generate_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
