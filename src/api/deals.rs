// ============================================================================
// Endpoints : deals et bundles
// ============================================================================

use tracing::{info, instrument};

use crate::api::client::OwnlyClient;
use crate::api::error::ApiError;
use crate::api::wire;
use crate::browse::ServerQuery;
use crate::models::{Bundle, Deal};

impl OwnlyClient {
    /// GET /deals avec les filtres que le serveur sait appliquer
    #[instrument(skip(self), fields(fingerprint = %query.fingerprint()))]
    pub async fn list_deals(&self, query: &ServerQuery) -> Result<Vec<Deal>, ApiError> {
        let json = self.get_json(&["deals"], &query.to_query_pairs()).await?;
        let deals = wire::parse_deals(json)?;
        info!(count = deals.len(), "Successfully fetched deals");
        Ok(deals)
    }

    /// GET /deals/:id
    #[instrument(skip(self))]
    pub async fn get_deal(&self, id: &str) -> Result<Deal, ApiError> {
        let json = self.get_json(&["deals", id], &[]).await?;
        let deal = wire::parse_deal(json)?;
        info!(title = %deal.title, "Successfully fetched deal");
        Ok(deal)
    }

    /// GET /bundles
    #[instrument(skip(self))]
    pub async fn list_bundles(&self) -> Result<Vec<Bundle>, ApiError> {
        let json = self.get_json(&["bundles"], &[]).await?;
        let bundles = wire::parse_bundles(json)?;
        info!(count = bundles.len(), "Successfully fetched bundles");
        Ok(bundles)
    }
}
