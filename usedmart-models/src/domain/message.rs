use super::{
    common::{PageParams, TimeRangeParams},
    product::ProductBrief,
    profile::ProfileBrief,
};
use crate::entities::message::{Entity as MessageEntity, Model as MessageModel};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    #[validate(range(min = 1, message = "receiverId is required"))]
    pub receiver_id: i32,
    #[validate(range(min = 1, message = "productId is required"))]
    pub product_id: i32,
    #[validate(length(min = 1, max = 2000, message = "content must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
#[sea_orm(active_model = "crate::entities::message::ActiveModel")]
pub struct NewMessage {
    pub sender_id: i32,
    pub receiver_id: i32,
    pub product_id: i32,
    pub content: String,
    pub is_read: bool,
}

impl NewMessage {
    pub fn unread(sender_id: i32, receiver_id: i32, product_id: i32, content: String) -> Self {
        Self {
            sender_id,
            receiver_id,
            product_id,
            content,
            is_read: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "MessageEntity")]
pub struct MessageInfo {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub product_id: i32,
    pub content: String,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<MessageModel> for MessageInfo {
    fn from(m: MessageModel) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            product_id: m.product_id,
            content: m.content,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

/// `GET /message/thread?productId=&counterpartId=`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThreadParams {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 1, message = "productId is required"))]
    pub product_id: i32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 1, message = "counterpartId is required"))]
    pub counterpart_id: i32,
}

/// One conversation row in the inbox, enriched for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub product_id: i32,
    pub counterpart_id: i32,
    pub product: Option<ProductBrief>,
    pub counterpart: Option<ProfileBrief>,
    pub last_message: MessageInfo,
    pub unread_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MessagePageParams {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub product_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub sender_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub receiver_id: Option<i32>,
    pub content: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
    #[serde(flatten)]
    #[validate(nested)]
    pub time_range: TimeRangeParams,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread: u64,
}
