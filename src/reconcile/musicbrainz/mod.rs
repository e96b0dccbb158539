//! MusicBrainz release search (the encyclopedia provider)
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API/Search

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_releases;
pub use client::MusicBrainzClient;
