// ============================================================================
// Module : notify
// ============================================================================
// File de notifications non bloquantes ("toasts")
//
// Une notification informe l'utilisateur du résultat d'une action (succès
// d'un investissement, erreur renvoyée par le serveur...) sans geler la
// boucle d'événements : elle s'affiche en bas de l'écran et disparaît seule
// après un délai, ou quand l'utilisateur la ferme.
//
// CONCEPT RUST : VecDeque
// - File FIFO avec push_back / pop_front en O(1)
// - La notification la plus ancienne est affichée en premier
// ============================================================================

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Durée d'affichage par défaut
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// Nombre maximum de notifications en attente
pub const MAX_PENDING: usize = 16;

/// Niveau de la notification (détermine la couleur)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub message: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }
}

/// File FIFO de notifications
#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    next_id: u64,
    ttl: Duration,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_TTL, MAX_PENDING)
    }

    pub fn with_settings(ttl: Duration, capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 1,
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Ajoute une notification en fin de file et retourne son id
    ///
    /// Si la file est pleine, la plus ancienne est abandonnée.
    pub fn push(&mut self, level: Level, message: impl Into<String>) -> u64 {
        self.push_at(level, message, Instant::now())
    }

    pub fn push_at(&mut self, level: Level, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }

        self.items.push_back(Notification {
            id,
            level,
            message: message.into(),
            created_at: now,
            ttl: self.ttl,
        });
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(Level::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(Level::Success, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(Level::Warning, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(Level::Error, message)
    }

    /// Ferme une notification précise. Retourne true si elle existait.
    pub fn dismiss(&mut self, id: u64) -> bool {
        match self.items.iter().position(|n| n.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Ferme la notification affichée (la plus ancienne)
    pub fn dismiss_front(&mut self) -> Option<Notification> {
        self.items.pop_front()
    }

    /// Supprime les notifications dont le délai est écoulé
    ///
    /// Appelé à chaque tick de la boucle principale.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        before - self.items.len()
    }

    pub fn front(&self) -> Option<&Notification> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = NotificationQueue::new();
        queue.info("first");
        queue.error("second");

        assert_eq!(queue.front().unwrap().message, "first");
        queue.dismiss_front();
        assert_eq!(queue.front().unwrap().message, "second");
        assert_eq!(queue.front().unwrap().level, Level::Error);
    }

    #[test]
    fn test_dismiss_by_id() {
        let mut queue = NotificationQueue::new();
        let a = queue.info("a");
        let b = queue.info("b");

        assert!(queue.dismiss(a));
        assert!(!queue.dismiss(a));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.front().unwrap().id, b);
    }

    #[test]
    fn test_expire() {
        let mut queue = NotificationQueue::with_settings(Duration::from_secs(5), 8);
        let start = Instant::now();
        queue.push_at(Level::Info, "old", start);
        queue.push_at(Level::Info, "new", start + Duration::from_secs(3));

        assert_eq!(queue.expire(start + Duration::from_secs(6)), 1);
        assert_eq!(queue.front().unwrap().message, "new");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut queue = NotificationQueue::with_settings(DEFAULT_TTL, 2);
        queue.info("1");
        queue.info("2");
        queue.info("3");

        let messages: Vec<_> = queue.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["2", "3"]);
    }
}
