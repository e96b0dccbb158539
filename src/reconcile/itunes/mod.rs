//! iTunes Search API integration (the commercial provider)
//!
//! Results are paginated with `limit`/`offset`; a full page holds
//! [`PAGE_SIZE`] records.
//!
//! API docs: https://performance-partners.apple.com/search-api

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_catalog_page;
pub use client::ITunesClient;

/// Results requested per page.
pub const PAGE_SIZE: usize = 200;
