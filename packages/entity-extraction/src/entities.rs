//! Built-in field schemas for the three supported entity types.
//!
//! Each schema pairs the field set with the declarative extraction
//! inputs the strategies evaluate: JSON-LD paths, CSS selector
//! candidates (most specific first), meta tag names, and regex
//! patterns. Weights drive the coverage portion of the confidence
//! score and sum to 1.0 per schema; the discrete location fields a
//! composite headquarters splits into carry no weight of their own.

use crate::config::{AcquisitionHints, ChainPolicy, ExtractorConfig, CONFIDENCE_STOP_EARLY};
use crate::types::schema::{EntityKind, FieldKind, FieldSchema, FieldSpec};

/// Schema for company pages.
pub fn company_schema() -> FieldSchema {
    FieldSchema::new(EntityKind::Company)
        .field(
            FieldSpec::new("company_name", FieldKind::Text)
                .weight(0.25)
                .hint("The company's legal or trading name")
                .metadata_path("name")
                .metadata_path("legalName")
                .selector("h1[data-test='company-name']")
                .selector(".top-card-layout__title")
                .selector("h1")
                .meta_name("og:site_name")
                .meta_name("og:title"),
        )
        .field(
            FieldSpec::new("description", FieldKind::LongText)
                .weight(0.20)
                .hint("What the company does, in its own words")
                .metadata_path("description")
                .selector("[data-test='about-us__description']")
                .selector(".about-us__description p")
                .selector("section.about p")
                .meta_name("og:description")
                .meta_name("description")
                .meta_name("twitter:description"),
        )
        .field(
            FieldSpec::new("industry", FieldKind::Category)
                .weight(0.15)
                .hint("Primary industry or sector")
                .metadata_path("industry")
                .selector("[data-test='about-us__industry'] dd")
                .selector(".top-card-layout__second-subline .top-card-link__description")
                .pattern(r"(?i)industry[:\s]+([A-Z][A-Za-z &,/\-]{2,60})")
                .context_pattern(r"(?i)(?:a|an|the)\s+([A-Z][A-Za-z &\-]{3,40})\s+company"),
        )
        .field(
            FieldSpec::new("company_size", FieldKind::Count)
                .weight(0.10)
                .hint("Employee count or range")
                .metadata_path("numberOfEmployees.value")
                .metadata_path("numberOfEmployees")
                .selector("[data-test='about-us__size'] dd")
                .pattern(r"(?i)(\d[\d,.]*)\s*[-\x{2013}]\s*(\d[\d,.]*)\s+employees")
                .pattern(r"(?i)([\d,.]+\+?)\s+employees")
                .context_pattern(r"(?i)we have\s+([\d,.]+)\s+employees")
                .context_pattern(r"(?i)team of\s+([\d,.]+)"),
        )
        .field(
            FieldSpec::new("headquarters", FieldKind::Text)
                .weight(0.10)
                .hint("Headquarters location as written on the page")
                .metadata_path("address")
                .selector("[data-test='about-us__headquarters'] dd")
                .pattern(r"(?i)headquarters[:\s]+([A-Z][A-Za-z\s,.\-]{2,80})")
                .context_pattern(r"(?i)headquartered in\s+([A-Z][A-Za-z\s,]{2,60})"),
        )
        .field(
            FieldSpec::new("founded", FieldKind::Year)
                .weight(0.08)
                .hint("The year the company was founded")
                .metadata_path("foundingDate")
                .selector("[data-test='about-us__foundedOn'] dd")
                .pattern(r"(?i)founded(?:\s+in)?[:\s]+(\d{4})")
                .context_pattern(r"(?i)founded in\s+(\d{4})")
                .context_pattern(r"(?i)since\s+(\d{4})"),
        )
        .field(
            FieldSpec::new("website", FieldKind::Url)
                .weight(0.07)
                .hint("The company's own website URL")
                .metadata_path("url")
                .metadata_path("sameAs")
                .selector("a[data-test='about-us__website']")
                .selector(".about-us__website a")
                .meta_name("og:url"),
        )
        .field(
            FieldSpec::new("specialties", FieldKind::List)
                .weight(0.05)
                .hint("Comma-separated specialties or focus areas")
                .metadata_path("knowsAbout")
                .metadata_path("keywords")
                .selector("[data-test='about-us__specialties'] dd")
                .meta_name("keywords")
                .pattern(r"(?i)specialties[:\s]+([A-Za-z][^<\n]{5,300})"),
        )
        .field(
            FieldSpec::new("city", FieldKind::Text)
                .hint("Headquarters city")
                .metadata_path("address.addressLocality"),
        )
        .field(
            FieldSpec::new("region", FieldKind::Text)
                .hint("Headquarters state or region")
                .metadata_path("address.addressRegion"),
        )
        .field(
            FieldSpec::new("country", FieldKind::Country)
                .hint("Headquarters country")
                .metadata_path("address.addressCountry"),
        )
}

/// Schema for social profile pages.
pub fn social_profile_schema() -> FieldSchema {
    FieldSchema::new(EntityKind::SocialProfile)
        .field(
            FieldSpec::new("username", FieldKind::Text)
                .weight(0.15)
                .hint("The profile's handle without the @")
                .metadata_path("alternateName")
                .metadata_path("identifier.value")
                .pattern(r#""username"\s*:\s*"([A-Za-z0-9._]{2,30})""#)
                .context_pattern(r"@([A-Za-z0-9._]{2,30})"),
        )
        .field(
            FieldSpec::new("full_name", FieldKind::Text)
                .weight(0.20)
                .hint("Display name of the person or brand")
                .metadata_path("name")
                .selector("header h1")
                .selector("h1")
                .meta_name("og:title")
                .meta_name("twitter:title"),
        )
        .field(
            FieldSpec::new("bio", FieldKind::LongText)
                .weight(0.15)
                .hint("Profile bio or about text")
                .metadata_path("description")
                .selector("header section > span")
                .selector(".profile-bio")
                .meta_name("og:description")
                .meta_name("description"),
        )
        .field(
            FieldSpec::new("followers", FieldKind::Count)
                .weight(0.15)
                .hint("Follower count, K/M suffixes accepted")
                .metadata_path("interactionStatistic.userInteractionCount")
                .pattern(r#""edge_followed_by"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#)
                .pattern(r"([\d.,]+\s?[KkMmBb]?)\s+[Ff]ollowers")
                .context_pattern(r"([\d.,]+\s?[KkMmBb]?)\s+[Ff]ollowers"),
        )
        .field(
            FieldSpec::new("following", FieldKind::Count)
                .weight(0.05)
                .hint("Accounts followed")
                .pattern(r#""edge_follow"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#)
                .pattern(r"([\d.,]+\s?[KkMmBb]?)\s+[Ff]ollowing"),
        )
        .field(
            FieldSpec::new("posts", FieldKind::Count)
                .weight(0.05)
                .hint("Number of posts")
                .pattern(r#""edge_owner_to_timeline_media"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#)
                .pattern(r"([\d.,]+\s?[KkMmBb]?)\s+[Pp]osts"),
        )
        .field(
            FieldSpec::new("website", FieldKind::Url)
                .weight(0.10)
                .hint("External link in the profile")
                .metadata_path("url")
                .metadata_path("sameAs")
                .selector("header a[rel~='me']")
                .selector("a[data-testid='external-link']"),
        )
        .field(
            FieldSpec::new("category", FieldKind::Category)
                .weight(0.10)
                .hint("Profile category label")
                .metadata_path("category")
                .selector("header [data-testid='category']")
                .pattern(r#""category_name"\s*:\s*"([^"]{2,60})""#),
        )
        .field(
            FieldSpec::new("location", FieldKind::Text)
                .weight(0.05)
                .hint("Location mentioned on the profile")
                .metadata_path("address")
                .selector("header [data-testid='location']")
                .context_pattern(r"(?i)based in\s+([A-Z][A-Za-z\s,]{2,40})"),
        )
}

/// Schema for business-listing pages.
pub fn business_listing_schema() -> FieldSchema {
    FieldSchema::new(EntityKind::BusinessListing)
        .field(
            FieldSpec::new("business_name", FieldKind::Text)
                .weight(0.25)
                .hint("The listed business name")
                .metadata_path("name")
                .selector("h1[itemprop='name']")
                .selector("h1.business-name")
                .selector("h1")
                .meta_name("og:title"),
        )
        .field(
            FieldSpec::new("description", FieldKind::LongText)
                .weight(0.15)
                .hint("Listing description")
                .metadata_path("description")
                .selector("[itemprop='description']")
                .selector(".business-description")
                .meta_name("og:description")
                .meta_name("description"),
        )
        .field(
            FieldSpec::new("category", FieldKind::Category)
                .weight(0.15)
                .hint("Business category")
                .metadata_path("category")
                .metadata_path("@type")
                .selector("[itemprop='category']")
                .selector(".category a")
                .pattern(r"(?i)category[:\s]+([A-Z][A-Za-z &,/\-]{2,60})"),
        )
        .field(
            FieldSpec::new("address", FieldKind::Text)
                .weight(0.15)
                .hint("Street address of the business")
                .metadata_path("address")
                .selector("[itemprop='address']")
                .selector("address")
                .selector(".street-address")
                .context_pattern(r"(?i)located at\s+([0-9][^.\n]{6,120})"),
        )
        .field(
            FieldSpec::new("phone", FieldKind::Phone)
                .weight(0.10)
                .hint("Primary phone number")
                .metadata_path("telephone")
                .selector("[itemprop='telephone']")
                .selector("a[href^='tel:']")
                .pattern(r"(?i)(?:phone|tel|call us)[:\s]*(\+?[\d\s().\-]{8,20}\d)"),
        )
        .field(
            FieldSpec::new("website", FieldKind::Url)
                .weight(0.10)
                .hint("The business's own website")
                .metadata_path("url")
                .selector("a[itemprop='url']")
                .selector(".website a")
                .meta_name("og:url"),
        )
        .field(
            FieldSpec::new("hours", FieldKind::List)
                .weight(0.05)
                .hint("Opening hours")
                .metadata_path("openingHours")
                .selector("[itemprop='openingHours']")
                .selector(".hours"),
        )
        .field(
            FieldSpec::new("review_count", FieldKind::Count)
                .weight(0.05)
                .hint("Number of reviews")
                .metadata_path("aggregateRating.reviewCount")
                .pattern(r"([\d.,]+)\s+reviews"),
        )
}

/// Default configuration per entity type.
///
/// Social profiles are the noisiest surface, so their chain demands the
/// higher stop-early confidence before settling; company and listing
/// pages accept the standard threshold. Profile pages also get settle
/// time and a scroll to coax lazy content out of the renderer.
pub fn default_config(entity: EntityKind) -> ExtractorConfig {
    match entity {
        EntityKind::Company => ExtractorConfig::new(),
        EntityKind::SocialProfile => ExtractorConfig::new()
            .with_policy(ChainPolicy::default().with_accept_confidence(CONFIDENCE_STOP_EARLY))
            .with_hints(
                AcquisitionHints::new()
                    .with_wait_ms(2_500)
                    .with_ready_selector("header")
                    .with_scroll(),
            )
            .with_profile_url_template("https://www.instagram.com/{username}/"),
        EntityKind::BusinessListing => ExtractorConfig::new(),
    }
}

/// The schema for an entity type.
pub fn schema_for(entity: EntityKind) -> FieldSchema {
    match entity {
        EntityKind::Company => company_schema(),
        EntityKind::SocialProfile => social_profile_schema(),
        EntityKind::BusinessListing => business_listing_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        for schema in [
            company_schema(),
            social_profile_schema(),
            business_listing_schema(),
        ] {
            let total = schema.total_weight();
            assert!(
                (total - 1.0).abs() < 0.001,
                "{} weights sum to {total}",
                schema.entity
            );
        }
    }

    #[test]
    fn test_company_field_order_starts_with_name() {
        let schema = company_schema();
        let first = schema.fields().next().unwrap();
        assert_eq!(first.name, "company_name");
        assert_eq!(first.weight, 0.25);
    }

    #[test]
    fn test_profile_config_demands_higher_confidence() {
        let config = default_config(EntityKind::SocialProfile);
        assert_eq!(config.policy.accept_confidence, CONFIDENCE_STOP_EARLY);
        assert!(config.profile_url_template.is_some());
    }
}
