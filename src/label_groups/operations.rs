//! Label group API operations.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::api::client::PolicyClient;
use crate::api::types::{ApiError, ApiResult, Href, PolicyStatus};
use crate::http::ApiResponse;
use crate::label_groups::table::LabelGroupTable;
use crate::label_groups::types::LabelGroup;

/// Collection endpoint, relative to the organization and policy version.
pub const LABEL_GROUPS_ENDPOINT: &str = "label_groups";

impl PolicyClient {
    /// Fetch every label group of a policy version and replace the lookup
    /// table with the result.
    ///
    /// `status` must be `draft` or `active` (any case); anything else fails
    /// before a request is made. A collection that reaches the configured
    /// async threshold is discarded and fetched again through the async job
    /// protocol, which is not subject to the page-size ceiling.
    pub async fn get_label_groups<K, V>(
        &self,
        query: &[(K, V)],
        status: &str,
    ) -> ApiResult<(Arc<LabelGroupTable>, ApiResponse)>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let status: PolicyStatus = status.parse()?;
        let endpoint = format!("sec_policy/{}/{}", status, LABEL_GROUPS_ENDPOINT);

        let (mut groups, mut response) = self.get_collection::<LabelGroup, _, _>(&endpoint, false, query).await?;
        let threshold = self.config().requests.async_threshold;
        if groups.len() >= threshold {
            tracing::info!(
                count = groups.len(),
                threshold,
                "Label group collection hit the page ceiling, re-fetching async"
            );
            (groups, response) = self.get_collection(&endpoint, true, query).await?;
        }

        let table = Arc::new(LabelGroupTable::new(groups));
        self.label_groups.store(table.clone());
        tracing::info!(status = %status, count = table.len(), "Label group lookup table replaced");

        Ok((table, response))
    }

    /// Fetch one label group by href. The lookup table is left untouched.
    pub async fn get_label_group(&self, href: &Href) -> ApiResult<(LabelGroup, ApiResponse)> {
        self.get_by_href(href).await
    }

    /// Create a label group in the draft policy.
    pub async fn create_label_group(&self, label_group: &LabelGroup) -> ApiResult<(LabelGroup, ApiResponse)> {
        let endpoint = format!("sec_policy/{}/{}", PolicyStatus::Draft, LABEL_GROUPS_ENDPOINT);
        self.post(&endpoint, label_group).await
    }

    /// Update an existing label group at its own href.
    ///
    /// `usage` and `key` are removed from the body; the server computes or
    /// fixes them.
    pub async fn update_label_group(&self, label_group: &LabelGroup) -> ApiResult<ApiResponse> {
        let href = label_group
            .href
            .as_ref()
            .filter(|h| !h.is_empty())
            .ok_or(ApiError::MissingHref)?;
        self.put(href, &label_group.for_update()).await
    }

    /// Current lookup table snapshot.
    pub fn label_group_table(&self) -> Arc<LabelGroupTable> {
        self.label_groups.load_full()
    }

    /// Every label covered by the label group at `href`, using the current
    /// lookup table snapshot.
    pub fn expand_label_group(&self, href: &Href) -> BTreeSet<Href> {
        self.label_groups.load().expand(href)
    }
}
