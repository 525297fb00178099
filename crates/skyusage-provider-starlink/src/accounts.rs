//! Account listing

use crate::client::StarlinkClient;
use serde::Deserialize;
use serde_json::Value;
use skyusage_core::error::Result;

/// Paged envelope whose `content.results` holds arbitrary records
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListEnvelope {
    #[serde(default)]
    content: Option<ListContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ListContent {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

impl ListEnvelope {
    pub(crate) fn into_results(self) -> Vec<Value> {
        self.content.and_then(|c| c.results).unwrap_or_default()
    }
}

pub struct AccountManager<'a> {
    client: &'a StarlinkClient,
}

impl<'a> AccountManager<'a> {
    pub(crate) fn new(client: &'a StarlinkClient) -> Self {
        Self { client }
    }

    /// Accounts reachable with the configured credentials
    pub async fn list_accounts(&self) -> Result<Vec<Value>> {
        let envelope: ListEnvelope = self.client.get("/enterprise/v1/accounts").await?;
        Ok(envelope.into_results())
    }
}
