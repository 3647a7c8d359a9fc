//! The contact bundle - multi-valued, union-only contact accumulation.
//!
//! Business contact info legitimately has multiple values, so unlike the
//! single-value consolidated record this accumulates *every* email, phone
//! number, and WhatsApp handle seen across all passes and acquisition
//! attempts of one extraction session. Values are deduplicated on insert
//! and never removed within a session.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Accumulated, deduplicated contact identifiers for one target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactBundle {
    emails: IndexSet<String>,
    phones: IndexSet<String>,
    whatsapp: IndexSet<String>,
}

impl ContactBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an email. Deduplication is case-insensitive; emails are
    /// stored lowercased. Returns true if the value was new.
    pub fn add_email(&mut self, email: impl AsRef<str>) -> bool {
        let email = email.as_ref().trim().to_lowercase();
        if email.is_empty() {
            return false;
        }
        self.emails.insert(email)
    }

    /// Add an already-normalized phone number. Returns true if new.
    pub fn add_phone(&mut self, phone: impl Into<String>) -> bool {
        let phone = phone.into();
        if phone.is_empty() {
            return false;
        }
        self.phones.insert(phone)
    }

    /// Add an already-normalized WhatsApp number. Returns true if new.
    pub fn add_whatsapp(&mut self, number: impl Into<String>) -> bool {
        let number = number.into();
        if number.is_empty() {
            return false;
        }
        self.whatsapp.insert(number)
    }

    /// Accumulated emails, in first-seen order.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    /// Accumulated phone numbers, in first-seen order.
    pub fn phones(&self) -> impl Iterator<Item = &str> {
        self.phones.iter().map(String::as_str)
    }

    /// Accumulated WhatsApp numbers, in first-seen order.
    pub fn whatsapp(&self) -> impl Iterator<Item = &str> {
        self.whatsapp.iter().map(String::as_str)
    }

    /// Whether a phone number is already recorded as a WhatsApp handle.
    pub fn has_whatsapp(&self, number: &str) -> bool {
        self.whatsapp.contains(number)
    }

    /// Total number of accumulated contact values.
    pub fn len(&self) -> usize {
        self.emails.len() + self.phones.len() + self.whatsapp.len()
    }

    /// Whether nothing was accumulated.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.whatsapp.is_empty()
    }
}
