//! Where controllers get their remote data from.

use std::future::Future;

use formfill_registry::{RegistryClient, RegistryError, RegistryRecord};
use formfill_suggest::{SuggestClient, SuggestError, SuggestionItem};

/// Address suggestions for a free-text query.
pub trait SuggestSource: Send + Sync + 'static {
    fn suggest(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SuggestionItem>, SuggestError>> + Send;

    /// Country codes results are post-filtered to; `None` keeps everything.
    fn locality(&self) -> Option<&[String]> {
        None
    }
}

/// Company records keyed by a checksum-valid identifier.
pub trait RegistrySource: Send + Sync + 'static {
    fn lookup(
        &self,
        ico: &str,
    ) -> impl Future<Output = Result<RegistryRecord, RegistryError>> + Send;
}

impl SuggestSource for SuggestClient {
    fn suggest(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SuggestionItem>, SuggestError>> + Send {
        SuggestClient::suggest(self, query)
    }

    fn locality(&self) -> Option<&[String]> {
        self.settings().locality.as_deref()
    }
}

impl RegistrySource for RegistryClient {
    fn lookup(
        &self,
        ico: &str,
    ) -> impl Future<Output = Result<RegistryRecord, RegistryError>> + Send {
        self.fetch(ico)
    }
}
