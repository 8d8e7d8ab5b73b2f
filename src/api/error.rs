// ============================================================================
// Erreurs de la frontière API
// ============================================================================
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère Display et std::error::Error
// - #[from] génère la conversion automatique utilisée par l'opérateur ?
// - Le code applicatif reste en anyhow : ApiError s'y convertit tout seul
// ============================================================================

use thiserror::Error;

/// Message affiché quand le serveur ne fournit pas de message exploitable
pub const GENERIC_FAILURE: &str = "Une erreur est survenue, veuillez réessayer.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Échec réseau (DNS, connexion refusée, timeout...)
    #[error("Échec de la requête HTTP : {0}")]
    Http(#[from] reqwest::Error),

    /// Le serveur a répondu avec un statut d'erreur
    /// Le message est celui de l'enveloppe d'erreur, tel quel
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Réponse syntaxiquement valide mais qui ne respecte pas le schéma attendu
    #[error("Réponse malformée ({field}) : {reason}")]
    Malformed { field: String, reason: String },

    /// Corps de réponse qui n'est pas du JSON exploitable
    #[error("JSON invalide : {0}")]
    Decode(#[from] serde_json::Error),

    /// URL inutilisable (base sans chemin, segment ".." ou vide)
    #[error("URL invalide : {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Malformed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Message à montrer à l'utilisateur
    ///
    /// Le message du serveur est repris mot pour mot ; les erreurs techniques
    /// sont remplacées par un message générique (le détail part dans les logs).
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_verbatim_for_server_errors() {
        let err = ApiError::Status {
            status: 422,
            message: "Amount is below the minimum ticket".to_string(),
        };
        assert_eq!(err.user_message(), "Amount is below the minimum ticket");
        assert_eq!(err.to_string(), "Amount is below the minimum ticket");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_user_message_falls_back_for_technical_errors() {
        let err = ApiError::malformed("deals[0].title", "missing");
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert!(err.to_string().contains("deals[0].title"));

        let empty = ApiError::Status { status: 500, message: String::new() };
        assert_eq!(empty.user_message(), GENERIC_FAILURE);
    }
}
