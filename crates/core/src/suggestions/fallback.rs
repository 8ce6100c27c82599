//! Deterministic suggestions used when the model cannot be relied on.
//!
//! Rules are evaluated in declaration order and the first rule with a keyword
//! contained in the lower-cased context wins.

use rust_decimal::Decimal;

use crate::invoicing::{LineItem, STANDARD_TAX_RATE};

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub description: &'static str,
    pub quantity: i64,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub catalog: &'static [CatalogEntry],
}

impl FallbackRule {
    pub fn matches(&self, lowered_context: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered_context.contains(keyword))
    }

    pub fn items(&self) -> Vec<LineItem> {
        catalog_items(self.catalog)
    }
}

pub const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        name: "web",
        keywords: &["site web", "website"],
        catalog: &[
            CatalogEntry {
                description: "Conception et développement du site web",
                quantity: 1,
                unit_price: 2500,
            },
            CatalogEntry {
                description: "Intégration système de paiement",
                quantity: 1,
                unit_price: 800,
            },
            CatalogEntry { description: "Formation et documentation", quantity: 4, unit_price: 150 },
        ],
    },
    FallbackRule {
        name: "training",
        keywords: &["formation", "cours"],
        catalog: &[
            CatalogEntry {
                description: "Formation professionnelle personnalisée",
                quantity: 8,
                unit_price: 200,
            },
            CatalogEntry { description: "Support et documentation", quantity: 1, unit_price: 300 },
        ],
    },
    FallbackRule {
        name: "consulting",
        keywords: &["consultant", "conseil"],
        catalog: &[
            CatalogEntry { description: "Consultation et analyse", quantity: 10, unit_price: 180 },
            CatalogEntry {
                description: "Rapport et recommandations",
                quantity: 1,
                unit_price: 500,
            },
        ],
    },
];

pub const GENERIC_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        description: "Prestation de service professionnelle",
        quantity: 1,
        unit_price: 1000,
    },
    CatalogEntry { description: "Frais additionnels et support", quantity: 1, unit_price: 200 },
];

/// First rule whose keywords appear in `context`, if any.
pub fn matched_rule(context: &str) -> Option<&'static FallbackRule> {
    let lowered = context.to_lowercase();
    FALLBACK_RULES.iter().find(|rule| rule.matches(&lowered))
}

pub fn generate(context: &str) -> Vec<LineItem> {
    match matched_rule(context) {
        Some(rule) => rule.items(),
        None => catalog_items(GENERIC_CATALOG),
    }
}

fn catalog_items(catalog: &[CatalogEntry]) -> Vec<LineItem> {
    catalog
        .iter()
        .map(|entry| {
            LineItem::new(
                entry.description,
                Decimal::from(entry.quantity),
                Decimal::from(entry.unit_price),
                Decimal::from(STANDARD_TAX_RATE),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{generate, matched_rule, FALLBACK_RULES};

    #[test]
    fn website_context_gets_web_catalog() {
        let items = generate("Je veux un site web pour ma boutique");

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].description, "Conception et développement du site web");
        assert_eq!(items[0].unit_price, Decimal::from(2500));
        assert_eq!(items[2].quantity, Decimal::from(4));
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(matched_rule("Refonte du WEBSITE vitrine").map(|rule| rule.name), Some("web"));
        assert_eq!(matched_rule("Mission de CONSEIL fiscal").map(|rule| rule.name), Some("consulting"));
    }

    #[test]
    fn unmatched_context_gets_generic_catalog() {
        let items = generate("analyse financière");

        assert!(matched_rule("analyse financière").is_none());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Prestation de service professionnelle");
        assert_eq!(items[1].description, "Frais additionnels et support");
    }

    #[test]
    fn earlier_rule_wins_when_several_match() {
        let context = "formation à la création de site web, avec conseil";
        assert_eq!(matched_rule(context).map(|rule| rule.name), Some("web"));

        let items = generate("cours particuliers et conseil");
        assert_eq!(items[0].description, "Formation professionnelle personnalisée");
    }

    #[test]
    fn every_catalog_line_uses_standard_rate() {
        let contexts = ["site web", "formation", "consultant", "rien"];
        for context in contexts {
            for item in generate(context) {
                assert_eq!(item.tax_rate_percent, Decimal::from(19));
                assert!(item.quantity > Decimal::ZERO);
            }
        }
    }

    #[test]
    fn rules_keep_declared_priority() {
        let names: Vec<&str> = FALLBACK_RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(names, vec!["web", "training", "consulting"]);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate("Cours de cuisine"), generate("Cours de cuisine"));
    }
}
