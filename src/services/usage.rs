//! Usage and credits service.

use std::sync::Arc;
use tracing::instrument;

use crate::errors::XeroMlResult;
use crate::services::executor::RequestExecutor;
use crate::types::usage::UsageInfo;

const USAGE_PATH: &str = "/v1/usage";

/// Service for reading account usage and remaining credits.
pub struct UsageService {
    executor: Arc<RequestExecutor>,
}

impl UsageService {
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Fetches credit balance, plan tier and monthly usage.
    #[instrument(skip(self))]
    pub async fn get(&self) -> XeroMlResult<UsageInfo> {
        let usage: UsageInfo = self.executor.get_json("get_usage", USAGE_PATH).await?;
        if usage.credits.is_exhausted() {
            tracing::warn!(tier = %usage.tier, "No XeroML credits remaining");
        }
        Ok(usage)
    }
}

impl std::fmt::Debug for UsageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageService").finish()
    }
}
