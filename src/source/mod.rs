//! Network access to the job search service.
//!
//! Every request the pipeline makes goes through [`JobSource`], so the paging
//! and enrichment loops can be driven by a scripted source in tests.

mod http;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpJobSource;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of search pages and detail pages.
///
/// `Err` means the exchange itself failed (timeout, refused connection, TLS);
/// any HTTP status, including errors, comes back as `Ok`.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Request one page of search results.
    async fn search_page(&self, params: &[(&'static str, String)]) -> Result<FetchedPage>;

    /// Request a detail page by URL.
    async fn detail_page(&self, url: &str) -> Result<FetchedPage>;
}

#[cfg(test)]
pub(crate) mod scripted {
    //! In-memory source replaying canned responses.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::{FetchedPage, JobSource};
    use crate::error::{AppError, Result};

    enum Reply {
        Page(FetchedPage),
        Fail,
    }

    /// Search pages keyed by `(keyword, page)`, detail pages keyed by URL.
    /// Unscripted search pages answer 400, unscripted detail pages 404.
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        pages: HashMap<(String, usize), Reply>,
        details: HashMap<String, Reply>,
        search_log: Mutex<Vec<(String, usize)>>,
        detail_log: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn page(mut self, keyword: &str, page: usize, reply: FetchedPage) -> Self {
            self.pages
                .insert((keyword.to_string(), page), Reply::Page(reply));
            self
        }

        /// A 200 page listing `items` under `stellenangebote`.
        pub(crate) fn items(self, keyword: &str, page: usize, items: Vec<Value>) -> Self {
            let body = json!({ "stellenangebote": items }).to_string();
            self.page(keyword, page, FetchedPage::new(200, body))
        }

        pub(crate) fn page_failure(mut self, keyword: &str, page: usize) -> Self {
            self.pages.insert((keyword.to_string(), page), Reply::Fail);
            self
        }

        pub(crate) fn detail(mut self, url: &str, reply: FetchedPage) -> Self {
            self.details.insert(url.to_string(), Reply::Page(reply));
            self
        }

        pub(crate) fn detail_failure(mut self, url: &str) -> Self {
            self.details.insert(url.to_string(), Reply::Fail);
            self
        }

        /// Every `(keyword, page)` requested so far, in order.
        pub(crate) fn searched(&self) -> Vec<(String, usize)> {
            self.search_log.lock().unwrap().clone()
        }

        pub(crate) fn requests_for(&self, keyword: &str) -> usize {
            self.searched().iter().filter(|(k, _)| k == keyword).count()
        }

        pub(crate) fn detail_requests(&self) -> Vec<String> {
            self.detail_log.lock().unwrap().clone()
        }

        fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> &'a str {
            params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl JobSource for ScriptedSource {
        async fn search_page(&self, params: &[(&'static str, String)]) -> Result<FetchedPage> {
            let keyword = Self::param(params, "was").to_string();
            let page: usize = Self::param(params, "page").parse().unwrap_or_default();
            self.search_log.lock().unwrap().push((keyword.clone(), page));

            match self.pages.get(&(keyword.clone(), page)) {
                Some(Reply::Page(p)) => Ok(p.clone()),
                Some(Reply::Fail) => Err(AppError::search(keyword, "connection reset")),
                None => Ok(FetchedPage::new(400, "")),
            }
        }

        async fn detail_page(&self, url: &str) -> Result<FetchedPage> {
            self.detail_log.lock().unwrap().push(url.to_string());

            match self.details.get(url) {
                Some(Reply::Page(p)) => Ok(p.clone()),
                Some(Reply::Fail) => Err(AppError::search(url, "timed out")),
                None => Ok(FetchedPage::new(404, "")),
            }
        }
    }
}
