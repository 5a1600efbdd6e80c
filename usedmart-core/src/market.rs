use serde::Serialize;
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

pub const SITE_NAME: &str = "site_name";
pub const SITE_DESCRIPTION: &str = "site_description";
pub const CONTACT_EMAIL: &str = "contact_email";
pub const CURRENCY: &str = "currency";
pub const MAINTENANCE_MODE: &str = "maintenance_mode";
pub const REQUIRE_PRODUCT_APPROVAL: &str = "require_product_approval";
pub const MAX_PRODUCTS_PER_USER: &str = "max_products_per_user";
pub const MAX_PRODUCT_IMAGES: &str = "max_product_images";

/// Marketplace behaviour configured through the `system_settings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSettings {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub currency: String,
    pub maintenance_mode: bool,
    pub require_product_approval: bool,
    /// `0` means unlimited.
    pub max_products_per_user: u32,
    pub max_product_images: u32,
    /// Keys this build does not know about, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            site_name: "UsedMart".into(),
            site_description: String::new(),
            contact_email: String::new(),
            currency: "CNY".into(),
            maintenance_mode: false,
            require_product_approval: true,
            max_products_per_user: 50,
            max_product_images: 9,
            extra: BTreeMap::new(),
        }
    }
}

fn parse_or<T>(key: &str, raw: &str, fallback: T) -> T
where
    T: FromStr + Display,
{
    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(key, value = raw, default = %fallback, "Unparsable system setting, using default");
            fallback
        }
    }
}

impl MarketSettings {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            settings.apply(key.as_ref(), value.as_ref());
        }
        settings
    }

    fn apply(&mut self, key: &str, value: &str) {
        let defaults = Self::default();
        match key {
            SITE_NAME => self.site_name = value.to_string(),
            SITE_DESCRIPTION => self.site_description = value.to_string(),
            CONTACT_EMAIL => self.contact_email = value.to_string(),
            CURRENCY => self.currency = value.to_string(),
            MAINTENANCE_MODE => {
                self.maintenance_mode = parse_or(key, value, defaults.maintenance_mode)
            }
            REQUIRE_PRODUCT_APPROVAL => {
                self.require_product_approval =
                    parse_or(key, value, defaults.require_product_approval)
            }
            MAX_PRODUCTS_PER_USER => {
                self.max_products_per_user = parse_or(key, value, defaults.max_products_per_user)
            }
            MAX_PRODUCT_IMAGES => {
                self.max_product_images = parse_or(key, value, defaults.max_product_images)
            }
            other => {
                self.extra.insert(other.to_string(), value.to_string());
            }
        }
    }

    /// Whether a seller holding `current` listings may add one more.
    #[inline]
    pub fn has_listing_room(&self, current: u64) -> bool {
        self.max_products_per_user == 0 || current < u64::from(self.max_products_per_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_give_defaults() {
        let settings = MarketSettings::from_pairs(Vec::<(String, String)>::new());
        assert_eq!(settings, MarketSettings::default());
        assert!(settings.require_product_approval);
        assert_eq!(settings.currency, "CNY");
    }

    #[test]
    fn test_known_keys_are_parsed() {
        let settings = MarketSettings::from_pairs([
            ("site_name", "Flea"),
            ("maintenance_mode", "true"),
            ("require_product_approval", " false "),
            ("max_products_per_user", "0"),
            ("max_product_images", "4"),
        ]);
        assert_eq!(settings.site_name, "Flea");
        assert!(settings.maintenance_mode);
        assert!(!settings.require_product_approval);
        assert_eq!(settings.max_products_per_user, 0);
        assert_eq!(settings.max_product_images, 4);
    }

    #[test]
    fn test_bad_values_fall_back_and_unknown_keys_are_kept() {
        let settings = MarketSettings::from_pairs([
            ("max_products_per_user", "lots"),
            ("maintenance_mode", "yes"),
            ("banner_color", "#ff0000"),
        ]);
        assert_eq!(settings.max_products_per_user, 50);
        assert!(!settings.maintenance_mode);
        assert_eq!(settings.extra.get("banner_color").map(String::as_str), Some("#ff0000"));
    }

    #[test]
    fn test_listing_room() {
        let mut settings = MarketSettings::default();
        assert!(settings.has_listing_room(49));
        assert!(!settings.has_listing_room(50));
        settings.max_products_per_user = 0;
        assert!(settings.has_listing_room(10_000));
    }
}
