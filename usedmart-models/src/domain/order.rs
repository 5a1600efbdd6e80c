use super::{
    common::{PageParams, TimeRangeParams},
    product::ProductBrief,
    profile::ProfileBrief,
};
use crate::{
    entities::order::{Entity as OrderEntity, Model as OrderModel},
    enums::order::{OrderParty, OrderStatus},
};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[validate(range(min = 1, message = "productId is required"))]
    pub product_id: i32,
    #[validate(length(max = 500, message = "shippingAddress is too long"))]
    pub shipping_address: Option<String>,
    #[validate(length(max = 1000, message = "note is too long"))]
    pub note: Option<String>,
    /// Optional opening message sent to the seller once the order exists.
    #[validate(length(min = 1, max = 2000, message = "message must be 1-2000 characters"))]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
#[sea_orm(active_model = "crate::entities::order::ActiveModel")]
pub struct NewOrder {
    pub product_id: i32,
    pub buyer_id: i32,
    pub seller_id: i32,
    pub amount: i64,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
}

/// `GET /order/page?as=buyer|seller&status=`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderPageParams {
    #[serde(default, rename = "as")]
    pub party: OrderParty,
    pub status: Option<OrderStatus>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderPageParams {
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub buyer_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub seller_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub product_id: Option<i32>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
    #[serde(flatten)]
    #[validate(nested)]
    pub time_range: TimeRangeParams,
}

/// Repository-level order filter shared by the user and admin listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub buyer_id: Option<i32>,
    pub seller_id: Option<i32>,
    pub product_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub time_range: TimeRangeParams,
    pub page: PageParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "OrderEntity")]
pub struct OrderInfo {
    pub id: i32,
    pub product_id: i32,
    pub buyer_id: i32,
    pub seller_id: i32,
    pub amount: i64,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<OrderModel> for OrderInfo {
    fn from(o: OrderModel) -> Self {
        Self {
            id: o.id,
            product_id: o.product_id,
            buyer_id: o.buyer_id,
            seller_id: o.seller_id,
            amount: o.amount,
            status: o.status,
            shipping_address: o.shipping_address,
            note: o.note,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderInfo,
    pub product: Option<ProductBrief>,
    pub buyer: Option<ProfileBrief>,
    pub seller: Option<ProfileBrief>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOrderStatus {
    #[validate(range(min = 1, message = "id is required"))]
    pub id: i32,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResult {
    pub order: OrderInfo,
    /// `false` when the opening message could not be delivered. The order stands.
    pub message_sent: bool,
}
