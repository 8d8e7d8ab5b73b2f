// ============================================================================
// Module : store
// ============================================================================
// Stockage local typé : watchlist, annonces favorites, recherches
// sauvegardées et session (token + utilisateur)
//
// Chaque clé est un fichier JSON dans le répertoire de données :
//   ~/.local/share/ownly/ownly_deal_watchlist.json
//   {"version": 1, "data": ["deal-1", "deal-7"]}
//
// Les anciens fichiers sans enveloppe (version 0 : la valeur brute, telle
// que le navigateur l'écrivait) sont migrés à la lecture.
//
// CONCEPTS RUST :
// 1. Trait avec constantes et type associé : chaque clé déclare son nom,
//    sa version et le type de sa valeur
// 2. Generics : get::<Watchlist>() retourne directement un BTreeSet<String>
// 3. DeserializeOwned : la valeur désérialisée ne dépend pas du buffer lu
//
// Pas de verrou : lecture-modification-écriture, la dernière écriture gagne.
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::browse::ListingFilter;

// ============================================================================
// Schéma des clés
// ============================================================================

/// Une clé du stockage local
pub trait StoreKey {
    /// Nom de la clé (et du fichier)
    const NAME: &'static str;

    /// Version courante du schéma
    const VERSION: u32;

    type Value: Serialize + DeserializeOwned + Default;

    /// Convertit une valeur écrite par une ancienne version
    ///
    /// Par défaut, le schéma est supposé identique.
    fn migrate(from_version: u32, raw: Value) -> Result<Self::Value> {
        debug!(key = Self::NAME, from_version, "Migrating stored value");
        serde_json::from_value(raw)
            .with_context(|| format!("Valeur illisible pour la clé {}", Self::NAME))
    }
}

/// Accepte des identifiants texte ou numériques (le navigateur stockait les
/// deux selon les pages)
fn migrate_id_set(key: &str, raw: Value) -> Result<BTreeSet<String>> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Null => return Ok(BTreeSet::new()),
        other => bail!("La clé {} devrait contenir une liste, trouvé : {}", key, other),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => bail!("Identifiant invalide dans {} : {}", key, other),
        })
        .collect()
}

/// Deals suivis
pub struct Watchlist;

impl StoreKey for Watchlist {
    const NAME: &'static str = "ownly_deal_watchlist";
    const VERSION: u32 = 1;
    type Value = BTreeSet<String>;

    fn migrate(_from_version: u32, raw: Value) -> Result<Self::Value> {
        migrate_id_set(Self::NAME, raw)
    }
}

/// Annonces favorites du marché secondaire
pub struct FavoriteListings;

impl StoreKey for FavoriteListings {
    const NAME: &'static str = "ownly_favorite_secondary_listings";
    const VERSION: u32 = 1;
    type Value = BTreeSet<String>;

    fn migrate(_from_version: u32, raw: Value) -> Result<Self::Value> {
        migrate_id_set(Self::NAME, raw)
    }
}

/// Une recherche sauvegardée du marché secondaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub name: String,
    pub filters: ListingFilter,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Recherches sauvegardées
pub struct SavedSearches;

impl StoreKey for SavedSearches {
    const NAME: &'static str = "ownly_saved_secondary_searches";
    const VERSION: u32 = 1;
    type Value = Vec<SavedSearch>;
}

/// Token d'authentification (fourni par l'utilisateur ou la config)
pub struct Token;

impl StoreKey for Token {
    const NAME: &'static str = "token";
    const VERSION: u32 = 1;
    type Value = Option<String>;
}

/// Profil de l'utilisateur connecté
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

pub struct User;

impl StoreKey for User {
    const NAME: &'static str = "user";
    const VERSION: u32 = 1;
    type Value = Option<UserProfile>;
}

/// Enveloppe versionnée écrite sur disque
#[derive(Debug, Serialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

// ============================================================================
// LocalStore
// ============================================================================

/// Service de persistance locale
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Ouvre (et crée si besoin) le répertoire de stockage
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Échec de la création du répertoire {}", dir.display()))?;
        info!(dir = %dir.display(), "Local store opened");
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Lit une clé (valeur par défaut si le fichier n'existe pas)
    pub fn get<K: StoreKey>(&self) -> Result<K::Value> {
        let path = self.path_for(K::NAME);
        if !path.exists() {
            return Ok(K::Value::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Échec de la lecture de {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(K::Value::default());
        }

        let raw: Value = serde_json::from_str(&contents)
            .with_context(|| format!("JSON invalide dans {}", path.display()))?;

        let (version, data) = split_envelope(raw);

        if version > K::VERSION {
            bail!(
                "La clé {} a été écrite par une version plus récente (v{} > v{})",
                K::NAME,
                version,
                K::VERSION
            );
        }

        if version == K::VERSION {
            return serde_json::from_value(data)
                .with_context(|| format!("Valeur illisible pour la clé {}", K::NAME));
        }

        // Ancienne version : migration puis réécriture au format courant
        let value = K::migrate(version, data)?;
        info!(key = K::NAME, from = version, to = K::VERSION, "Migrated stored value");
        if let Err(e) = self.set::<K>(&value) {
            warn!(key = K::NAME, error = ?e, "Failed to rewrite migrated value");
        }
        Ok(value)
    }

    /// Écrit une clé (remplace la valeur entière)
    pub fn set<K: StoreKey>(&self, value: &K::Value) -> Result<()> {
        let path = self.path_for(K::NAME);
        let envelope = Envelope {
            version: K::VERSION,
            data: value,
        };
        let json = serde_json::to_string_pretty(&envelope)
            .with_context(|| format!("Échec de la sérialisation de {}", K::NAME))?;

        // Écriture dans un fichier temporaire puis renommage : un crash
        // en cours d'écriture ne laisse pas un fichier tronqué
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Échec de l'écriture de {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Échec du renommage vers {}", path.display()))?;

        debug!(key = K::NAME, "Stored value written");
        Ok(())
    }

    /// Supprime une clé
    pub fn remove<K: StoreKey>(&self) -> Result<()> {
        let path = self.path_for(K::NAME);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Échec de la suppression de {}", path.display()))?;
        }
        Ok(())
    }

    /// Ajoute ou retire un identifiant d'un ensemble persistant
    ///
    /// Retourne true si l'identifiant a été ajouté, false s'il a été retiré.
    pub fn toggle<K>(&self, id: &str) -> Result<bool>
    where
        K: StoreKey<Value = BTreeSet<String>>,
    {
        let mut set = self.get::<K>()?;
        let added = if set.remove(id) {
            false
        } else {
            set.insert(id.to_string());
            true
        };
        self.set::<K>(&set)?;
        info!(key = K::NAME, id, added, "Toggled stored id");
        Ok(added)
    }

    // ------------------------------------------------------------------------
    // Recherches sauvegardées
    // ------------------------------------------------------------------------

    /// Sauvegarde une recherche (remplace une recherche du même nom)
    pub fn save_search(&self, name: &str, filters: &ListingFilter) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Le nom de la recherche est vide");
        }

        let mut searches = self.get::<SavedSearches>()?;
        searches.retain(|s| s.name != name);
        searches.push(SavedSearch {
            name: name.to_string(),
            filters: filters.clone(),
            created_at: Utc::now(),
        });
        self.set::<SavedSearches>(&searches)
    }

    /// Recharge les filtres d'une recherche sauvegardée
    pub fn load_search(&self, name: &str) -> Result<Option<ListingFilter>> {
        let searches = self.get::<SavedSearches>()?;
        Ok(searches
            .into_iter()
            .find(|s| s.name == name.trim())
            .map(|s| s.filters))
    }

    pub fn delete_search(&self, name: &str) -> Result<bool> {
        let mut searches = self.get::<SavedSearches>()?;
        let before = searches.len();
        searches.retain(|s| s.name != name.trim());
        let removed = searches.len() != before;
        if removed {
            self.set::<SavedSearches>(&searches)?;
        }
        Ok(removed)
    }
}

/// Sépare l'enveloppe versionnée d'une valeur brute (version 0)
fn split_envelope(raw: Value) -> (u32, Value) {
    match raw {
        Value::Object(mut map)
            if map.len() == 2
                && map.contains_key("data")
                && map.get("version").and_then(Value::as_u64).is_some() =>
        {
            let version = map.get("version").and_then(Value::as_u64).unwrap_or(0);
            let data = map.remove("data").unwrap_or(Value::Null);
            (u32::try_from(version).unwrap_or(u32::MAX), data)
        }
        other => (0, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_reads_default() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        assert!(store.get::<Watchlist>().unwrap().is_empty());
        assert_eq!(store.get::<Token>().unwrap(), None);
    }

    #[test]
    fn test_watchlist_toggle_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = LocalStore::open(dir.path()).unwrap();
            assert!(store.toggle::<Watchlist>("deal-42").unwrap());
        }

        // "Rechargement de la page" : nouveau store sur le même répertoire
        let store = LocalStore::open(dir.path()).unwrap();
        assert!(store.get::<Watchlist>().unwrap().contains("deal-42"));

        let written = fs::read_to_string(dir.path().join("ownly_deal_watchlist.json")).unwrap();
        assert!(written.contains("\"version\": 1"));

        assert!(!store.toggle::<Watchlist>("deal-42").unwrap());
        assert!(store.get::<Watchlist>().unwrap().is_empty());
    }

    #[test]
    fn test_legacy_bare_array_is_migrated() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("ownly_favorite_secondary_listings.json"),
            r#"["l-1", 7]"#,
        )
        .unwrap();

        let store = LocalStore::open(dir.path()).unwrap();
        let favorites = store.get::<FavoriteListings>().unwrap();
        assert!(favorites.contains("l-1"));
        assert!(favorites.contains("7"));

        // Réécrit au format versionné
        let written = fs::read_to_string(dir.path().join("ownly_favorite_secondary_listings.json")).unwrap();
        let raw: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(raw["version"], 1);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("ownly_deal_watchlist.json"),
            r#"{"version": 9, "data": []}"#,
        )
        .unwrap();

        let store = LocalStore::open(dir.path()).unwrap();
        assert!(store.get::<Watchlist>().is_err());
    }

    #[test]
    fn test_saved_search_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        let filters = ListingFilter {
            min_price: "1000".to_string(),
            ..Default::default()
        };
        store.save_search("High ROI", &filters).unwrap();

        let loaded = store.load_search("High ROI").unwrap().unwrap();
        assert_eq!(loaded.min_price, "1000");

        // Même nom : remplacement
        store.save_search("High ROI", &ListingFilter::default()).unwrap();
        assert_eq!(store.get::<SavedSearches>().unwrap().len(), 1);

        assert!(store.delete_search("High ROI").unwrap());
        assert!(store.load_search("High ROI").unwrap().is_none());
    }

    #[test]
    fn test_legacy_saved_search_from_browser() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("ownly_saved_secondary_searches.json"),
            r#"[{"name": "High ROI", "filters": {"minPrice": "1000"}}]"#,
        )
        .unwrap();

        let store = LocalStore::open(dir.path()).unwrap();
        let loaded = store.load_search("High ROI").unwrap().unwrap();
        assert_eq!(loaded.min_price, "1000");
        assert!(!loaded.favorites_only);
    }

    #[test]
    fn test_session_keys() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        store.set::<Token>(&Some("abc".to_string())).unwrap();
        store
            .set::<User>(&Some(UserProfile {
                id: "u1".to_string(),
                name: "Layla".to_string(),
                email: "layla@example.com".to_string(),
            }))
            .unwrap();

        assert_eq!(store.get::<Token>().unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get::<User>().unwrap().unwrap().name, "Layla");

        store.remove::<Token>().unwrap();
        assert_eq!(store.get::<Token>().unwrap(), None);
    }
}
