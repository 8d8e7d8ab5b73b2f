// ============================================================================
// Endpoints : marché secondaire
// ============================================================================

use serde_json::json;
use tracing::{info, instrument};

use crate::api::client::OwnlyClient;
use crate::api::error::ApiError;
use crate::api::wire::{self, Receipt};
use crate::browse::ServerQuery;
use crate::models::SecondaryListing;

impl OwnlyClient {
    /// GET /secondary-market/listings
    #[instrument(skip(self), fields(fingerprint = %query.fingerprint()))]
    pub async fn list_listings(&self, query: &ServerQuery) -> Result<Vec<SecondaryListing>, ApiError> {
        let json = self
            .get_json(&["secondary-market", "listings"], &query.to_query_pairs())
            .await?;
        let listings = wire::parse_listings(json)?;
        info!(count = listings.len(), "Successfully fetched listings");
        Ok(listings)
    }

    /// POST /secondary-market/listings/:id/offer, corps { offerPrice }
    ///
    /// Le prix est envoyé tel quel, sans arrondi.
    #[instrument(skip(self))]
    pub async fn make_offer(&self, listing_id: &str, offer_price: f64) -> Result<Receipt, ApiError> {
        let body = json!({ "offerPrice": offer_price });
        let json = self
            .post_json(&["secondary-market", "listings", listing_id, "offer"], &body)
            .await?;
        info!("Offer submitted");
        Ok(wire::parse_receipt(json))
    }

    /// POST /secondary-market/offers/:id/accept
    #[instrument(skip(self))]
    pub async fn accept_offer(&self, offer_id: &str) -> Result<Receipt, ApiError> {
        let json = self
            .post_json(&["secondary-market", "offers", offer_id, "accept"], &json!({}))
            .await?;
        info!("Offer accepted");
        Ok(wire::parse_receipt(json))
    }

    /// POST /secondary-market/offers/:id/reject
    #[instrument(skip(self))]
    pub async fn reject_offer(&self, offer_id: &str) -> Result<Receipt, ApiError> {
        let json = self
            .post_json(&["secondary-market", "offers", offer_id, "reject"], &json!({}))
            .await?;
        info!("Offer rejected");
        Ok(wire::parse_receipt(json))
    }

    /// POST /secondary-market/listings/:id/cancel
    #[instrument(skip(self))]
    pub async fn cancel_listing(&self, listing_id: &str) -> Result<Receipt, ApiError> {
        let json = self
            .post_json(&["secondary-market", "listings", listing_id, "cancel"], &json!({}))
            .await?;
        info!("Listing cancelled");
        Ok(wire::parse_receipt(json))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_offer_endpoint_path() {
        let client = OwnlyClient::new("https://api.ownly.io/api", None, Duration::from_secs(1)).unwrap();
        let url = client
            .endpoint(&["secondary-market", "listings", "l-7", "offer"])
            .unwrap();
        assert_eq!(url.path(), "/api/secondary-market/listings/l-7/offer");
    }

    #[test]
    fn test_offer_body_keeps_exact_value() {
        // 1234.567 ne doit pas devenir 1234.57
        let body = json!({ "offerPrice": 1234.567_f64 });
        assert_eq!(body["offerPrice"].as_f64(), Some(1234.567));
    }
}
