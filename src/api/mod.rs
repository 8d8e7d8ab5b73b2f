// ============================================================================
// Module : api
// ============================================================================
// Client de l'API REST OWNLY. Le client ne fait qu'appeler l'API : toute la
// logique métier (exécution des investissements, comptabilité des SPV,
// appariement du marché secondaire) reste côté serveur.
// ============================================================================

pub mod client;  // Client HTTP partagé
pub mod error;   // ApiError (thiserror)
pub mod wire;    // Structures du fil + validation

mod account;     // Investissements, portefeuille
mod deals;       // Deals, bundles
mod market;      // Marché secondaire

// Re-export des éléments principaux
pub use client::OwnlyClient;
pub use error::ApiError;
pub use wire::Receipt;
