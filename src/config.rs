// ============================================================================
// Module : config
// ============================================================================
// Configuration du client, dans l'ordre de priorité :
// 1. Variables d'environnement (OWNLY_API_URL, OWNLY_API_TOKEN, OWNLY_DATA_DIR)
// 2. Fichier JSON : ~/.config/ownly/config.json (optionnel)
// 3. Valeurs par défaut
//
// CONCEPT RUST : #[serde(default)]
// - Les champs absents du fichier prennent la valeur de Config::default()
// - Un fichier partiel ({"page_size": 20}) est donc valide
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Racine de l'API REST
    pub api_base_url: String,

    /// Token Bearer (sinon : celui du stockage local)
    pub api_token: Option<String>,

    /// Répertoire du stockage local (watchlist, favoris...)
    pub data_dir: PathBuf,

    /// Répertoire des fichiers de log
    pub log_dir: PathBuf,

    /// Nombre d'éléments par "page" (touche 'm' = afficher plus)
    pub page_size: usize,

    /// Délai de debounce des filtres, en millisecondes
    pub debounce_ms: u64,

    /// Rafraîchissement automatique de la liste affichée, en secondes (0 = jamais)
    pub refresh_secs: u64,

    /// Timeout des requêtes HTTP, en secondes
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        // Linux : ~/.local/share/ownly
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ownly");

        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            log_dir: data_dir.join("logs"),
            data_dir,
            page_size: 12,
            debounce_ms: 400,
            refresh_secs: 60,
            request_timeout_secs: 15,
        }
    }
}

impl Config {
    /// Chemin du fichier de configuration par défaut
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ownly").join("config.json"))
    }

    /// Charge la configuration complète (fichier + environnement)
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Lit un fichier de configuration JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Échec de la lecture de {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&contents)
            .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
        let explicit_log_dir = value.get("log_dir").is_some();
        let mut config: Config = serde_json::from_value(value)
            .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
        // Sans log_dir explicite, les logs suivent le répertoire de données
        if !explicit_log_dir {
            config.log_dir = config.data_dir.join("logs");
        }
        info!(path = %path.display(), "Configuration file loaded");
        Ok(config)
    }

    /// Applique les surcharges d'environnement
    ///
    /// CONCEPT RUST : closure en paramètre
    /// - `lookup` remplace std::env::var, ce qui rend la fonction testable
    ///   sans modifier l'environnement du process
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OWNLY_API_URL").filter(|v| !v.trim().is_empty()) {
            debug!(url = %url, "API URL overridden from environment");
            self.api_base_url = url;
        }
        if let Some(token) = lookup("OWNLY_API_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(dir) = lookup("OWNLY_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            let data_dir = PathBuf::from(dir);
            // log_dir suit data_dir, sauf s'il a été placé ailleurs
            if self.log_dir == self.data_dir.join("logs") {
                self.log_dir = data_dir.join("logs");
            }
            self.data_dir = data_dir;
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// None si le rafraîchissement automatique est désactivé
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_secs > 0).then(|| Duration::from_secs(self.refresh_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "page_size": 20, "api_base_url": "https://api.ownly.io/api" }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.api_base_url, "https://api.ownly.io/api");
        assert_eq!(config.debounce_ms, Config::default().debounce_ms);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ page_size: ").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OWNLY_API_URL", "https://staging.ownly.io/api"),
            ("OWNLY_API_TOKEN", "secret"),
            ("OWNLY_DATA_DIR", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        let default_dir = config.data_dir.clone();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://staging.ownly.io/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        // Valeur vide : ignorée
        assert_eq!(config.data_dir, default_dir);
    }

    #[test]
    fn test_data_dir_override_moves_default_log_dir() {
        let mut config = Config::default();
        config.apply_env(|key| (key == "OWNLY_DATA_DIR").then(|| "/tmp/ownly-data".to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/ownly-data"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/ownly-data/logs"));

        // Un log_dir explicite n'est pas déplacé
        let mut custom = Config {
            log_dir: PathBuf::from("/var/log/ownly"),
            ..Config::default()
        };
        custom.apply_env(|key| (key == "OWNLY_DATA_DIR").then(|| "/tmp/ownly-data".to_string()));
        assert_eq!(custom.log_dir, PathBuf::from("/var/log/ownly"));
    }

    #[test]
    fn test_file_data_dir_carries_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "data_dir": "/srv/ownly" }"#).unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/srv/ownly/logs"));

        std::fs::write(&path, r#"{ "data_dir": "/srv/ownly", "log_dir": "/var/log/ownly" }"#).unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/var/log/ownly"));
    }

    #[test]
    fn test_refresh_interval() {
        let mut config = Config::default();
        assert_eq!(config.refresh_interval(), Some(Duration::from_secs(60)));
        config.refresh_secs = 0;
        assert_eq!(config.refresh_interval(), None);
    }
}
