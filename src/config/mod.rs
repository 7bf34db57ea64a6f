//! Configuration module

mod site;

pub use site::LatLng;
pub use site::MapConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
