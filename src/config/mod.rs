//! Configuration module

mod site;

pub use site::AnalyticsConfig;
pub use site::ApiConfig;
pub use site::BuildConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
