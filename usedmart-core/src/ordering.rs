//! Order placement and status transition rules.

use crate::rules::{RuleError, RuleResult};
use usedmart_models::enums::{
    order::{OrderParty, OrderStatus},
    product::ProductStatus,
};

/// Checks a purchase of a listing owned by `seller_id` in `status`.
pub fn check_purchase(buyer_id: i32, seller_id: i32, status: ProductStatus) -> RuleResult {
    if buyer_id == seller_id {
        return Err(RuleError::Invalid("You cannot buy your own listing".into()));
    }
    if status != ProductStatus::Active {
        return Err(RuleError::Invalid(format!(
            "Listing is {status} and cannot be ordered"
        )));
    }
    Ok(())
}

/// Which side of the order `profile_id` is on, if any.
#[inline]
pub fn party_of(profile_id: i32, buyer_id: i32, seller_id: i32) -> Option<OrderParty> {
    if profile_id == seller_id {
        Some(OrderParty::Seller)
    } else if profile_id == buyer_id {
        Some(OrderParty::Buyer)
    } else {
        None
    }
}

/// Parties allowed to move an order from `from` to `to`. Empty when the
/// transition does not exist.
pub fn allowed_parties(from: OrderStatus, to: OrderStatus) -> &'static [OrderParty] {
    use OrderParty::*;
    use OrderStatus::*;

    match (from, to) {
        (Pending, Confirmed) => &[Seller],
        (Pending, Cancelled) => &[Buyer, Seller],
        (Confirmed, Shipped) => &[Seller],
        (Confirmed, Cancelled) => &[Seller],
        (Shipped, Completed) => &[Buyer],
        _ => &[],
    }
}

pub fn check_order_transition(from: OrderStatus, to: OrderStatus, actor: OrderParty) -> RuleResult {
    let parties = allowed_parties(from, to);
    if parties.is_empty() {
        return Err(RuleError::Invalid(format!(
            "Order cannot move from {from} to {to}"
        )));
    }
    if !parties.contains(&actor) {
        return Err(RuleError::Forbidden(format!(
            "Only the {} can move an order from {from} to {to}",
            match actor {
                OrderParty::Buyer => "seller",
                OrderParty::Seller => "buyer",
            }
        )));
    }
    Ok(())
}

/// Listing status implied by an order entering `to`.
#[inline]
pub fn product_status_on(to: OrderStatus) -> Option<ProductStatus> {
    match to {
        OrderStatus::Confirmed => Some(ProductStatus::Sold),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderParty::*;
    use OrderStatus::*;

    #[test]
    fn test_transition_table() {
        let allowed = [
            (Pending, Confirmed, Seller),
            (Pending, Cancelled, Buyer),
            (Pending, Cancelled, Seller),
            (Confirmed, Shipped, Seller),
            (Confirmed, Cancelled, Seller),
            (Shipped, Completed, Buyer),
        ];
        for (from, to, actor) in allowed {
            assert!(check_order_transition(from, to, actor).is_ok(), "{from}->{to} by {actor:?}");
        }
    }

    #[test]
    fn test_wrong_party_is_forbidden() {
        assert!(matches!(
            check_order_transition(Pending, Confirmed, Buyer),
            Err(RuleError::Forbidden(_))
        ));
        assert!(matches!(
            check_order_transition(Shipped, Completed, Seller),
            Err(RuleError::Forbidden(_))
        ));
        assert!(matches!(
            check_order_transition(Confirmed, Cancelled, Buyer),
            Err(RuleError::Forbidden(_))
        ));
    }

    #[test]
    fn test_terminal_states_do_not_move() {
        for to in [Pending, Confirmed, Shipped, Completed, Cancelled] {
            assert!(matches!(
                check_order_transition(Completed, to, Buyer),
                Err(RuleError::Invalid(_))
            ));
            assert!(matches!(
                check_order_transition(Cancelled, to, Seller),
                Err(RuleError::Invalid(_))
            ));
        }
        assert!(matches!(
            check_order_transition(Pending, Shipped, Seller),
            Err(RuleError::Invalid(_))
        ));
    }

    #[test]
    fn test_purchase_checks() {
        assert!(check_purchase(1, 2, ProductStatus::Active).is_ok());
        assert!(check_purchase(2, 2, ProductStatus::Active).is_err());
        assert!(check_purchase(1, 2, ProductStatus::Sold).is_err());
        assert!(check_purchase(1, 2, ProductStatus::Pending).is_err());
    }

    #[test]
    fn test_party_and_side_effects() {
        assert_eq!(party_of(2, 1, 2), Some(Seller));
        assert_eq!(party_of(1, 1, 2), Some(Buyer));
        assert_eq!(party_of(3, 1, 2), None);
        assert_eq!(product_status_on(Confirmed), Some(ProductStatus::Sold));
        assert_eq!(product_status_on(Shipped), None);
    }
}
