// ============================================================================
// Déclencheur de requêtes
// ============================================================================
// Transforme les changements de filtre en appels réseau :
// - debounce : on attend que l'utilisateur arrête de taper
// - empreinte : on ne relance pas une requête identique à la précédente
// - génération : chaque requête reçoit un numéro croissant, une réponse dont
//   le numéro n'est plus le dernier émis est ignorée (une réponse lente ne
//   peut pas écraser une réponse plus récente)
//
// CONCEPT : Machine à états pilotée par le temps
// - Les méthodes prennent `now: Instant` en paramètre
// - Aucune horloge cachée : le comportement est testable sans sleep
// ============================================================================

use std::time::{Duration, Instant};

use tracing::debug;

use crate::browse::filter::ServerQuery;

/// Requête prête à être envoyée au worker
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTicket {
    pub generation: u64,
    pub query: ServerQuery,
}

#[derive(Debug)]
struct Pending {
    query: ServerQuery,
    fingerprint: String,
    due: Instant,
}

/// Debounce + empreinte + génération
#[derive(Debug)]
pub struct QueryTrigger {
    debounce: Duration,
    pending: Option<Pending>,
    last_fingerprint: Option<String>,
    generation: u64,
}

impl QueryTrigger {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            last_fingerprint: None,
            generation: 0,
        }
    }

    /// Signale un changement de filtre
    ///
    /// Repousse l'échéance à chaque appel : seul le dernier état compte.
    pub fn on_change(&mut self, query: ServerQuery, now: Instant) {
        let fingerprint = query.fingerprint();
        self.pending = Some(Pending {
            query,
            fingerprint,
            due: now + self.debounce,
        });
    }

    /// Retourne une requête à envoyer si l'échéance est passée et que
    /// l'empreinte diffère de la dernière requête envoyée
    pub fn poll(&mut self, now: Instant) -> Option<QueryTicket> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return None;
        }

        let pending = self.pending.take()?;
        if self.last_fingerprint.as_deref() == Some(pending.fingerprint.as_str()) {
            debug!(fingerprint = %pending.fingerprint, "Query unchanged, skipping fetch");
            return None;
        }

        Some(self.issue(pending.query, pending.fingerprint))
    }

    /// Force une requête immédiate (chargement initial, rafraîchissement)
    pub fn force(&mut self, query: ServerQuery) -> QueryTicket {
        self.pending = None;
        let fingerprint = query.fingerprint();
        self.issue(query, fingerprint)
    }

    fn issue(&mut self, query: ServerQuery, fingerprint: String) -> QueryTicket {
        self.generation += 1;
        debug!(generation = self.generation, fingerprint = %fingerprint, "Issuing query");
        self.last_fingerprint = Some(fingerprint);
        QueryTicket {
            generation: self.generation,
            query,
        }
    }

    /// Une réponse de cette génération est-elle encore d'actualité ?
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(status: &str) -> ServerQuery {
        ServerQuery {
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let mut trigger = QueryTrigger::new(Duration::from_millis(400));
        let t0 = Instant::now();

        trigger.on_change(query("open"), t0);
        assert!(trigger.poll(t0 + Duration::from_millis(200)).is_none());

        // Nouvelle frappe : l'échéance est repoussée
        trigger.on_change(query("funded"), t0 + Duration::from_millis(300));
        assert!(trigger.poll(t0 + Duration::from_millis(500)).is_none());

        let ticket = trigger.poll(t0 + Duration::from_millis(700)).unwrap();
        assert_eq!(ticket.query, query("funded"));
        assert_eq!(ticket.generation, 1);
        assert!(!trigger.has_pending());
    }

    #[test]
    fn test_same_fingerprint_is_not_refetched() {
        let mut trigger = QueryTrigger::new(Duration::ZERO);
        let t0 = Instant::now();

        trigger.on_change(query("open"), t0);
        assert!(trigger.poll(t0).is_some());

        trigger.on_change(query("open"), t0);
        assert!(trigger.poll(t0).is_none());
        assert_eq!(trigger.generation(), 1);
    }

    #[test]
    fn test_stale_generation_is_not_current() {
        let mut trigger = QueryTrigger::new(Duration::ZERO);
        let t0 = Instant::now();

        let first = trigger.force(query("open"));
        trigger.on_change(query("closed"), t0);
        let second = trigger.poll(t0).unwrap();

        assert!(!trigger.is_current(first.generation));
        assert!(trigger.is_current(second.generation));
    }

    #[test]
    fn test_force_always_issues() {
        let mut trigger = QueryTrigger::new(Duration::ZERO);
        let a = trigger.force(query("open"));
        let b = trigger.force(query("open"));
        assert_eq!(b.generation, a.generation + 1);
    }
}
