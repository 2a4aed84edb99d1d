//! # assetproc-store
//!
//! HTTP implementation of [`AssetStore`](assetproc_core::AssetStore) for the
//! web application's service API.
//!
//! API routes are authenticated with a shared bearer token. Raw file
//! downloads go straight to the file URL stored on the asset and never carry
//! that token.

pub mod client;
pub mod config;

pub use client::HttpAssetStore;
pub use config::StoreConfig;
