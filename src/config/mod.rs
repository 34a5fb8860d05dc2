// src/config/mod.rs
pub mod proxy;

pub use proxy::{allowed_origins, mask_secret, ApiKey, ProxyConfig};
