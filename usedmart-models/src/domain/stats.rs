use serde::Serialize;
use std::collections::BTreeMap;

/// Dashboard counters for the moderation console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub total_profiles: u64,
    pub total_products: u64,
    pub active_products: u64,
    pub pending_products: u64,
    pub sold_products: u64,
    pub total_orders: u64,
    pub completed_orders: u64,
    pub total_messages: u64,
    pub total_categories: u64,
    pub total_favorites: u64,
    pub total_roles: u64,
    pub total_permissions: u64,
    /// Listing count per status name, every status present.
    pub products_by_status: BTreeMap<String, u64>,
}
