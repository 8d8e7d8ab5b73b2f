// ============================================================================
// OWNLY - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client REST OWNLY
pub mod models;    // Structures de données (deals, annonces, bundles)
pub mod browse;    // Filtres, pagination, requêtes, comparateur
pub mod store;     // Stockage local versionné (watchlist, favoris, token)
pub mod metrics;   // Calculs affichés (ROI, progression, compte à rebours)
pub mod invest;    // Formulaire d'investissement / d'offre
pub mod notify;    // File de notifications
pub mod content;   // Contenu statique (FAQ, Shariah)
pub mod config;    // Configuration (fichier + variables d'environnement)
pub mod app;       // État de l'application
pub mod ui;        // Interface utilisateur
