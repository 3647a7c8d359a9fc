//! Multi-value contact extraction.
//!
//! Runs across every text blob seen during an extraction session: bio
//! text, contact-modal text, full page text, structured payload values.
//! For each blob it finds email-shaped substrings, phone-shaped
//! substrings (with and without an explicit WhatsApp label), and
//! WhatsApp deep links, normalizes them, and adds them to the session's
//! [`ContactBundle`]. Accumulation is idempotent and order-independent;
//! later passes over different content strictly add.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ContactConfig;
use crate::types::contact::ContactBundle;
use crate::validate::normalize_phone;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

/// wa.me and api.whatsapp.com deep links carrying a number.
static WHATSAPP_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:wa\.me/|api\.whatsapp\.com/send\?phone=)(\+?\d{8,15})").unwrap()
});

/// A phone written next to an explicit WhatsApp label.
static WHATSAPP_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)whatsapp[\s:.\-]*(\+?[\d\s().\-]{8,20}\d)").unwrap()
});

/// General phone shapes, international or region-prefixed national.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\d{0,3}[\s.\-]?\(?\d{2,4}\)?[\s.\-]?\d{3,5}[\s.\-]?\d{4}").unwrap()
});

/// A bare national mobile format: a two-digit area code, an optional
/// leading 9, then 8 digits. Recognizing this shape lets a configured
/// default country prefix be applied.
static NATIONAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}9?\d{8}$").unwrap());

/// Contact sniffer: stateless over the session apart from its config.
#[derive(Debug, Clone, Default)]
pub struct ContactSniffer {
    config: ContactConfig,
}

impl ContactSniffer {
    pub fn new(config: ContactConfig) -> Self {
        Self { config }
    }

    /// Scan one text blob and add everything found to the bundle.
    /// Never removes previously accumulated values.
    pub fn accumulate(&self, text: &str, bundle: &mut ContactBundle) {
        if text.trim().is_empty() {
            return;
        }

        for caps in WHATSAPP_LINK_RE.captures_iter(text) {
            if let Some(number) = normalize_phone(&caps[1]) {
                bundle.add_whatsapp(self.with_default_prefix(number));
            }
        }

        for caps in WHATSAPP_LABEL_RE.captures_iter(text) {
            if let Some(number) = normalize_phone(&caps[1]) {
                bundle.add_whatsapp(self.with_default_prefix(number));
            }
        }

        for m in EMAIL_RE.find_iter(text) {
            bundle.add_email(m.as_str());
        }

        for m in PHONE_RE.find_iter(text) {
            if let Some(number) = normalize_phone(m.as_str()) {
                let number = self.with_default_prefix(number);
                // A number already recorded under its WhatsApp label is
                // not repeated in the plain phone list.
                if !bundle.has_whatsapp(&number) {
                    bundle.add_phone(number);
                }
            }
        }
    }

    /// Prefix a bare national-format number with the configured country
    /// code. Numbers that already carry a plus are left alone.
    fn with_default_prefix(&self, number: String) -> String {
        if number.starts_with('+') {
            return number;
        }
        match &self.config.default_country_code {
            Some(code) if NATIONAL_RE.is_match(&number) => format!("+{code}{number}"),
            _ => number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sniffer() -> ContactSniffer {
        ContactSniffer::new(ContactConfig::default())
    }

    #[test]
    fn test_accumulation_is_idempotent_across_blobs() {
        let sniffer = sniffer();
        let mut bundle = ContactBundle::new();

        sniffer.accumulate("Reach us at sales@acme.com today", &mut bundle);
        sniffer.accumulate("Questions? SALES@acme.com answers.", &mut bundle);

        assert_eq!(bundle.emails().collect::<Vec<_>>(), vec!["sales@acme.com"]);
    }

    #[test]
    fn test_distinct_phones_from_multiple_blobs_in_any_order() {
        let sniffer = sniffer();
        let blob_a = "Call +1 555 123 4567";
        let blob_b = "Or +44 20 7946 0958";

        let mut forward = ContactBundle::new();
        sniffer.accumulate(blob_a, &mut forward);
        sniffer.accumulate(blob_b, &mut forward);

        let mut reverse = ContactBundle::new();
        sniffer.accumulate(blob_b, &mut reverse);
        sniffer.accumulate(blob_a, &mut reverse);

        let mut fwd: Vec<_> = forward.phones().collect();
        let mut rev: Vec<_> = reverse.phones().collect();
        fwd.sort_unstable();
        rev.sort_unstable();
        assert_eq!(fwd, rev);
        assert_eq!(fwd.len(), 2);
    }

    #[test]
    fn test_whatsapp_deep_link() {
        let sniffer = sniffer();
        let mut bundle = ContactBundle::new();
        sniffer.accumulate("Chat: https://wa.me/5511987654321?text=hi", &mut bundle);

        assert_eq!(bundle.whatsapp().collect::<Vec<_>>(), vec!["5511987654321"]);
        assert_eq!(bundle.phones().count(), 0);
    }

    #[test]
    fn test_labeled_whatsapp_number() {
        let sniffer = sniffer();
        let mut bundle = ContactBundle::new();
        sniffer.accumulate("WhatsApp: +55 11 98765-4321", &mut bundle);

        assert_eq!(bundle.whatsapp().collect::<Vec<_>>(), vec!["+5511987654321"]);
    }

    #[test]
    fn test_national_format_gets_default_prefix() {
        let sniffer = ContactSniffer::new(ContactConfig {
            default_country_code: Some("55".to_string()),
        });
        let mut bundle = ContactBundle::new();
        sniffer.accumulate("Ligue (11) 98765-4321", &mut bundle);

        assert_eq!(bundle.phones().collect::<Vec<_>>(), vec!["+5511987654321"]);
    }

    #[test]
    fn test_no_prefix_without_configuration() {
        let sniffer = sniffer();
        let mut bundle = ContactBundle::new();
        sniffer.accumulate("Ligue (11) 98765-4321", &mut bundle);

        assert_eq!(bundle.phones().collect::<Vec<_>>(), vec!["11987654321"]);
    }

    #[test]
    fn test_short_strings_are_not_phones() {
        let sniffer = sniffer();
        let mut bundle = ContactBundle::new();
        sniffer.accumulate("Established 1998, open 9-17", &mut bundle);
        assert!(bundle.is_empty());
    }
}
