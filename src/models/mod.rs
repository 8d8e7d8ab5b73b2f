// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les structures de données affichées par le client.
// Ce sont des snapshots de l'API : le client ne les modifie jamais.
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod deal;    // Deals (immobilier, franchise, startup...)
pub mod listing; // Annonces du marché secondaire
pub mod bundle;  // Paniers de deals
pub mod wallet;  // Solde du portefeuille

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use ownly::models::deal::Deal;
// On peut faire : use ownly::models::Deal;
pub use deal::{Deal, DealStatus, DealType, Spv};
pub use listing::{DealSummary, InvestmentRef, ListingStatus, Offer, SecondaryListing, Seller};
pub use bundle::{Allocation, Bundle};
pub use wallet::WalletBalance;
