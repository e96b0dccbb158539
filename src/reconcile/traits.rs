//! Trait definitions for the provider search calls the engine consumes.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the reqwest clients, while tests substitute the
//! scripted mocks below.
//!
//! Both calls must report a parent-initiated cancellation as
//! [`ReconcileError::Cancelled`] and a per-request timeout as
//! [`ReconcileError::Timeout`]; the engine treats them very differently.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::domain::{CatalogPage, CatalogQuery, EncyclopediaRelease, ReconcileError};

/// Commercial catalog search (paginated).
#[async_trait]
pub trait CatalogSearchApi: Send + Sync {
    /// Results per full page.
    fn page_size(&self) -> usize;

    /// Fetch one page of results.
    async fn search(
        &self,
        query: &CatalogQuery,
        cancel: &CancellationToken,
    ) -> Result<CatalogPage, ReconcileError>;
}

/// Encyclopedia release search (Lucene-style query).
#[async_trait]
pub trait EncyclopediaSearchApi: Send + Sync {
    async fn search_releases(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<EncyclopediaRelease>, ReconcileError>;
}

#[async_trait]
impl CatalogSearchApi for super::itunes::ITunesClient {
    fn page_size(&self) -> usize {
        super::itunes::PAGE_SIZE
    }

    async fn search(
        &self,
        query: &CatalogQuery,
        cancel: &CancellationToken,
    ) -> Result<CatalogPage, ReconcileError> {
        self.search(query, cancel).await
    }
}

#[async_trait]
impl EncyclopediaSearchApi for super::musicbrainz::MusicBrainzClient {
    async fn search_releases(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<EncyclopediaRelease>, ReconcileError> {
        self.search_releases(query, cancel).await
    }
}

/// Scripted provider mocks for testing.
#[cfg(test)]
pub mod mocks {
    use std::sync::Mutex;

    use super::*;
    use crate::reconcile::domain::{CatalogItem, CategoryHint};

    type QueryMatcher = Box<dyn Fn(&CatalogQuery) -> bool + Send + Sync>;

    enum Scripted {
        Items(Vec<CatalogItem>),
        Fail(ReconcileError),
    }

    /// Mock commercial catalog.
    ///
    /// The first rule whose matcher accepts a query answers it; item lists are
    /// paginated by the query offset. Unmatched queries return an empty page.
    pub struct MockCatalog {
        page_size: usize,
        rules: Vec<(QueryMatcher, Scripted)>,
        calls: Mutex<Vec<CatalogQuery>>,
        /// Cancel this token during the given call number, then never return
        cancel_during: Option<(usize, CancellationToken)>,
    }

    impl MockCatalog {
        /// A catalog that matches nothing.
        pub fn empty() -> Self {
            Self {
                page_size: 200,
                rules: Vec::new(),
                calls: Mutex::new(Vec::new()),
                cancel_during: None,
            }
        }

        pub fn with_page_size(mut self, page_size: usize) -> Self {
            self.page_size = page_size;
            self
        }

        /// Answer matching queries with these items.
        pub fn on(
            mut self,
            matcher: impl Fn(&CatalogQuery) -> bool + Send + Sync + 'static,
            items: Vec<CatalogItem>,
        ) -> Self {
            self.rules.push((Box::new(matcher), Scripted::Items(items)));
            self
        }

        /// Answer album-category (or uncategorized) queries for this exact term.
        pub fn on_term(self, term: &str, items: Vec<CatalogItem>) -> Self {
            let term = term.to_string();
            self.on(
                move |q| q.term == term && q.category != Some(CategoryHint::MusicArtist),
                items,
            )
        }

        /// Answer artist-category queries for this exact term.
        pub fn on_artist_term(self, term: &str, items: Vec<CatalogItem>) -> Self {
            let term = term.to_string();
            self.on(
                move |q| q.term == term && q.category == Some(CategoryHint::MusicArtist),
                items,
            )
        }

        /// Fail matching queries with this error.
        pub fn fail(
            mut self,
            matcher: impl Fn(&CatalogQuery) -> bool + Send + Sync + 'static,
            error: ReconcileError,
        ) -> Self {
            self.rules.push((Box::new(matcher), Scripted::Fail(error)));
            self
        }

        /// Cancel `token` while serving call number `call` (zero-based).
        pub fn cancel_during(mut self, call: usize, token: CancellationToken) -> Self {
            self.cancel_during = Some((call, token));
            self
        }

        /// Every query received, in order.
        pub fn calls(&self) -> Vec<CatalogQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogSearchApi for MockCatalog {
        fn page_size(&self) -> usize {
            self.page_size
        }

        async fn search(
            &self,
            query: &CatalogQuery,
            _cancel: &CancellationToken,
        ) -> Result<CatalogPage, ReconcileError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(query.clone());
                calls.len() - 1
            };

            if let Some((at, ref token)) = self.cancel_during
                && at == call
            {
                token.cancel();
                std::future::pending::<()>().await;
            }

            let Some((_, scripted)) = self.rules.iter().find(|(matcher, _)| matcher(query)) else {
                return Ok(CatalogPage::default());
            };

            match scripted {
                Scripted::Fail(error) => Err(error.clone()),
                Scripted::Items(items) => Ok(CatalogPage {
                    total_count: items.len(),
                    results: items
                        .iter()
                        .skip(query.offset)
                        .take(self.page_size)
                        .cloned()
                        .collect(),
                }),
            }
        }
    }

    /// Mock encyclopedia keyed by exact query string.
    #[derive(Default)]
    pub struct MockEncyclopedia {
        responses: Vec<(String, Result<Vec<EncyclopediaRelease>, ReconcileError>)>,
        calls: Mutex<Vec<String>>,
    }

    impl MockEncyclopedia {
        pub fn on(mut self, query: &str, releases: Vec<EncyclopediaRelease>) -> Self {
            self.responses.push((query.to_string(), Ok(releases)));
            self
        }

        pub fn fail(mut self, query: &str, error: ReconcileError) -> Self {
            self.responses.push((query.to_string(), Err(error)));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EncyclopediaSearchApi for MockEncyclopedia {
        async fn search_releases(
            &self,
            query: &str,
            _cancel: &CancellationToken,
        ) -> Result<Vec<EncyclopediaRelease>, ReconcileError> {
            self.calls.lock().unwrap().push(query.to_string());
            self.responses
                .iter()
                .find(|(q, _)| q == query)
                .map(|(_, r)| r.clone())
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn query(term: &str, offset: usize) -> CatalogQuery {
            CatalogQuery {
                term: term.to_string(),
                category: Some(CategoryHint::Album),
                omit_category: false,
                field: None,
                offset,
            }
        }

        #[tokio::test]
        async fn test_mock_catalog_paginates() {
            let items: Vec<_> = (0..5)
                .map(|i| CatalogItem::album("Madonna", format!("Album {i}"), 10))
                .collect();
            let mock = MockCatalog::empty().with_page_size(2).on_term("madonna", items);
            let token = CancellationToken::new();

            let first = mock.search(&query("madonna", 0), &token).await.unwrap();
            assert_eq!(first.total_count, 5);
            assert_eq!(first.results.len(), 2);

            let last = mock.search(&query("madonna", 4), &token).await.unwrap();
            assert_eq!(last.results.len(), 1);
            assert_eq!(last.results[0].collection_name, "Album 4");
            assert_eq!(mock.calls().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_catalog_unmatched_is_empty() {
            let mock = MockCatalog::empty();
            let page = mock
                .search(&query("nobody", 0), &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(page.total_count, 0);
            assert!(page.results.is_empty());
        }

        #[tokio::test]
        async fn test_mock_catalog_error() {
            let mock = MockCatalog::empty().fail(|_| true, ReconcileError::Network("down".to_string()));
            let result = mock.search(&query("x", 0), &CancellationToken::new()).await;
            assert!(matches!(result, Err(ReconcileError::Network(_))));
        }

        #[tokio::test]
        async fn test_mock_encyclopedia() {
            let mock = MockEncyclopedia::default().on(
                "barcode:123",
                vec![EncyclopediaRelease {
                    id: "mb-1".to_string(),
                    ..Default::default()
                }],
            );
            let token = CancellationToken::new();
            assert_eq!(mock.search_releases("barcode:123", &token).await.unwrap().len(), 1);
            assert!(mock.search_releases("other", &token).await.unwrap().is_empty());
            assert_eq!(mock.calls(), vec!["barcode:123", "other"]);
        }
    }
}
