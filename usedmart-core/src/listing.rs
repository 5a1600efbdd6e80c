//! Rules for listing lifecycle changes made by sellers and moderators.

use crate::{
    market::MarketSettings,
    rules::{RuleError, RuleResult},
};
use usedmart_models::enums::product::ProductStatus;

/// Status a new listing starts in.
#[inline]
pub fn initial_status(settings: &MarketSettings) -> ProductStatus {
    if settings.require_product_approval {
        ProductStatus::Pending
    } else {
        ProductStatus::Active
    }
}

/// Checks run before a seller creates a listing.
pub fn check_new_listing(
    settings: &MarketSettings,
    existing_listings: u64,
    image_count: usize,
) -> RuleResult {
    if settings.maintenance_mode {
        return Err(RuleError::Maintenance);
    }
    if !settings.has_listing_room(existing_listings) {
        return Err(RuleError::Limit(format!(
            "Listing limit of {} reached",
            settings.max_products_per_user
        )));
    }
    check_image_count(settings, image_count)
}

pub fn check_image_count(settings: &MarketSettings, image_count: usize) -> RuleResult {
    if image_count > settings.max_product_images as usize {
        return Err(RuleError::Limit(format!(
            "At most {} images per listing",
            settings.max_product_images
        )));
    }
    Ok(())
}

/// Status after the seller edits a listing. Rejected listings go back into
/// the moderation queue. Sold listings are frozen.
pub fn status_after_edit(current: ProductStatus) -> RuleResult<ProductStatus> {
    match current {
        ProductStatus::Sold => Err(RuleError::Invalid("Sold listings cannot be edited".into())),
        ProductStatus::Rejected => Ok(ProductStatus::Pending),
        other => Ok(other),
    }
}

/// Status changes a seller may make on their own listing.
pub fn check_owner_transition(from: ProductStatus, to: ProductStatus) -> RuleResult {
    use ProductStatus::*;

    match (from, to) {
        (Active, Inactive) | (Inactive, Active) | (Active, Sold) | (Inactive, Sold) => Ok(()),
        (from, to) if from == to => Err(RuleError::Invalid(format!("Listing is already {to}"))),
        (from, to) => Err(RuleError::Invalid(format!(
            "A seller cannot move a listing from {from} to {to}"
        ))),
    }
}

pub fn check_approve(from: ProductStatus) -> RuleResult {
    match from {
        ProductStatus::Pending | ProductStatus::Rejected => Ok(()),
        other => Err(RuleError::Invalid(format!(
            "Only pending or rejected listings can be approved, this one is {other}"
        ))),
    }
}

pub fn check_reject(from: ProductStatus) -> RuleResult {
    match from {
        ProductStatus::Pending | ProductStatus::Active => Ok(()),
        other => Err(RuleError::Invalid(format!(
            "Only pending or active listings can be rejected, this one is {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProductStatus::*;

    #[test]
    fn test_initial_status_follows_approval_setting() {
        let mut settings = MarketSettings::default();
        assert_eq!(initial_status(&settings), Pending);
        settings.require_product_approval = false;
        assert_eq!(initial_status(&settings), Active);
    }

    #[test]
    fn test_new_listing_limits() {
        let mut settings = MarketSettings::default();
        assert!(check_new_listing(&settings, 0, 9).is_ok());
        assert!(matches!(
            check_new_listing(&settings, 0, 10),
            Err(RuleError::Limit(_))
        ));
        assert!(matches!(
            check_new_listing(&settings, 50, 1),
            Err(RuleError::Limit(_))
        ));
        settings.maintenance_mode = true;
        assert_eq!(
            check_new_listing(&settings, 0, 0),
            Err(RuleError::Maintenance)
        );
    }

    #[test]
    fn test_edit_resubmits_rejected() {
        assert_eq!(status_after_edit(Rejected), Ok(Pending));
        assert_eq!(status_after_edit(Active), Ok(Active));
        assert!(status_after_edit(Sold).is_err());
    }

    #[test]
    fn test_owner_transitions() {
        for (from, to) in [(Active, Inactive), (Inactive, Active), (Active, Sold), (Inactive, Sold)] {
            assert!(check_owner_transition(from, to).is_ok(), "{from} -> {to}");
        }
        for (from, to) in [(Pending, Active), (Rejected, Active), (Sold, Active), (Active, Active)] {
            assert!(check_owner_transition(from, to).is_err(), "{from} -> {to}");
        }
    }

    #[test]
    fn test_moderation_gates() {
        assert!(check_approve(Pending).is_ok());
        assert!(check_approve(Rejected).is_ok());
        assert!(check_approve(Active).is_err());
        assert!(check_reject(Pending).is_ok());
        assert!(check_reject(Active).is_ok());
        assert!(check_reject(Sold).is_err());
    }
}
