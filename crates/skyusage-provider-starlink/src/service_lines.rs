//! Service line (terminal subscription) listing and details

use crate::accounts::ListEnvelope;
use crate::client::StarlinkClient;
use serde::Deserialize;
use serde_json::Value;
use skyusage_core::error::Result;
use skyusage_core::types::{AccountId, ServiceLineId};

/// Page size of the service line listing
const LIST_LIMIT: u32 = 50;

#[derive(Debug, Default, Deserialize)]
struct DetailEnvelope {
    #[serde(default)]
    content: Option<Value>,
}

/// `/enterprise/v1/account/{account}/service-lines`, account percent-encoded
fn service_lines_path(account: &AccountId) -> String {
    format!(
        "/enterprise/v1/account/{}/service-lines",
        urlencoding::encode(account.as_str())
    )
}

pub struct ServiceLineManager<'a> {
    client: &'a StarlinkClient,
}

impl<'a> ServiceLineManager<'a> {
    pub(crate) fn new(client: &'a StarlinkClient) -> Self {
        Self { client }
    }

    /// First page of an account's service lines, newest first
    pub async fn list_service_lines(&self, account: &AccountId) -> Result<Vec<Value>> {
        let endpoint = format!(
            "{}?limit={LIST_LIMIT}&page=0&orderByCreatedDateDescending=true",
            service_lines_path(account)
        );
        let envelope: ListEnvelope = self.client.get(&endpoint).await?;
        Ok(envelope.into_results())
    }

    /// Details of one service line; `Value::Null` when the provider sends no content
    pub async fn get_service_line(
        &self,
        account: &AccountId,
        service_line: &ServiceLineId,
    ) -> Result<Value> {
        let endpoint = format!(
            "{}/{}",
            service_lines_path(account),
            urlencoding::encode(service_line.as_str())
        );
        let envelope: DetailEnvelope = self.client.get(&endpoint).await?;
        Ok(envelope.content.unwrap_or_default())
    }
}
