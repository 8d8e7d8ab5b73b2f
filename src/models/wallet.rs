// ============================================================================
// Structure : WalletBalance
// ============================================================================
// Solde disponible du portefeuille (GET /wallet/balance)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalletBalance {
    pub available_balance: f64,
}

impl WalletBalance {
    pub fn new(available_balance: f64) -> Self {
        Self { available_balance }
    }
}
