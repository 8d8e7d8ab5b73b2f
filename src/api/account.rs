// ============================================================================
// Endpoints : investissements et portefeuille
// ============================================================================
// Pas de clé d'idempotence ni de retry : une soumission = un POST. Le
// backend valide le montant et applique l'investissement.
// ============================================================================

use serde_json::json;
use tracing::{info, instrument};

use crate::api::client::OwnlyClient;
use crate::api::error::ApiError;
use crate::api::wire::{self, Receipt};
use crate::models::WalletBalance;

impl OwnlyClient {
    /// GET /wallet/balance
    #[instrument(skip(self))]
    pub async fn wallet_balance(&self) -> Result<WalletBalance, ApiError> {
        let json = self.get_json(&["wallet", "balance"], &[]).await?;
        let balance = wire::parse_wallet(json)?;
        info!(available = balance.available_balance, "Successfully fetched wallet balance");
        Ok(balance)
    }

    /// POST /investments, corps { spvId, amount }
    #[instrument(skip(self))]
    pub async fn invest(&self, spv_id: &str, amount: f64) -> Result<Receipt, ApiError> {
        let body = json!({ "spvId": spv_id, "amount": amount });
        let json = self.post_json(&["investments"], &body).await?;
        let receipt = wire::parse_receipt(json);
        info!(investment_id = ?receipt.id, "Investment submitted");
        Ok(receipt)
    }
}
