//! Buyer/seller messaging about listings.

use crate::{middleware::RequestContext, rbac::is_authenticated};
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Query};
use sea_orm::DatabaseConnection;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_core::{group_conversations, total_unread, unread_message_ids};
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{
        ConversationView, MessageInfo, NewMessage, SendMessage, ThreadParams, UnreadCount,
    },
    enums::common::EntityType,
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::{MessageRepository, ProductRepository, ProfileRepository};

pub(super) const ROUTER_PREFIX: &str = "/message";

/// Configure message routes
///
/// # Routes
/// - POST ``: Send a message about a listing
/// - GET `/conversations`: The caller's inbox, one row per conversation
/// - GET `/thread`: One conversation, oldest first, marking it read
/// - GET `/unread-count`: Messages waiting for the caller
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(send))
        .route("/conversations", web::get().to(conversations))
        .route("/thread", web::get().to(thread))
        .route("/unread-count", web::get().to(unread_count));
}

/// Any signed-in profile. Rows are scoped to the caller inside the handlers.
#[inline]
#[instrument(name = "init-message-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing message module RBAC rules...");

    for (method, path) in [
        (Method::POST, ""),
        (Method::GET, "/conversations"),
        (Method::GET, "/thread"),
        (Method::GET, "/unread-count"),
    ] {
        perm_checker
            .register(
                method,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                is_authenticated()?,
            )
            .await?;
    }

    info!("Message module RBAC rules initialized successfully");
    Ok(())
}

/// Send a message
///
/// # Endpoint
/// `POST /api/message`
///
/// # Errors
/// - Bad Request (400): the receiver is the sender
/// - Not Found (404): unknown listing or receiver
#[instrument(name = "send-message", skip_all)]
async fn send(ctx: RequestContext, req: Json<SendMessage>) -> WebResult<WebResponse<MessageInfo>> {
    let sender_id = ctx.profile_id()?;
    let req = req.into_inner();
    if req.receiver_id == sender_id {
        return Err(WebError::BadRequest(
            "You cannot message yourself".to_string(),
        ));
    }
    if ProductRepository::find_by_id::<DatabaseConnection>(req.product_id, None)
        .await?
        .is_none()
    {
        return Err(WebError::NotFound(EntityType::Product.to_string()));
    }
    if !ProfileRepository::exists_by_id::<DatabaseConnection>(req.receiver_id, None).await? {
        return Err(WebError::NotFound(EntityType::Profile.to_string()));
    }

    let message = MessageRepository::create::<DatabaseConnection>(
        NewMessage::unread(sender_id, req.receiver_id, req.product_id, req.content),
        None,
    )
    .await?;
    info!(
        message_id = message.id,
        sender_id,
        receiver_id = message.receiver_id,
        product_id = message.product_id,
        "Message sent"
    );
    Ok(WebResponse::ok(message.into()))
}

/// The caller's conversations, newest first
///
/// # Endpoint
/// `GET /api/message/conversations`
///
/// # Description
/// Every message the caller sent or received, grouped by listing and
/// counterpart. Each row carries the latest message and the number of
/// unread messages addressed to the caller.
async fn conversations(ctx: RequestContext) -> WebResult<WebResponse<Vec<ConversationView>>> {
    let me = ctx.profile_id()?;
    let rows = MessageRepository::find_for_profile::<DatabaseConnection>(me, None).await?;
    debug!(profile_id = me, rows = rows.len(), unread = total_unread(me, &rows), "Messages loaded");
    let groups = group_conversations(me, rows);

    let product_ids: BTreeSet<i32> = groups.iter().map(|c| c.key.product_id).collect();
    let profile_ids: BTreeSet<i32> = groups.iter().map(|c| c.key.counterpart_id).collect();

    let products: HashMap<_, _> = ProductRepository::find_briefs::<DatabaseConnection>(
        product_ids.into_iter().collect(),
        None,
    )
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();
    let profiles: HashMap<_, _> = ProfileRepository::find_briefs::<DatabaseConnection>(
        profile_ids.into_iter().collect(),
        None,
    )
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();

    let views = groups
        .into_iter()
        .map(|c| ConversationView {
            product_id: c.key.product_id,
            counterpart_id: c.key.counterpart_id,
            product: products.get(&c.key.product_id).cloned(),
            counterpart: profiles.get(&c.key.counterpart_id).cloned(),
            last_message: c.last_message,
            unread_count: c.unread_count,
        })
        .collect();

    Ok(WebResponse::ok(views))
}

/// One conversation
///
/// # Endpoint
/// `GET /api/message/thread?productId=&counterpartId=`
///
/// # Description
/// Returns the messages oldest first. Messages the caller received and had
/// not read are marked read.
async fn thread(
    ctx: RequestContext,
    params: Query<ThreadParams>,
) -> WebResult<WebResponse<Vec<MessageInfo>>> {
    let me = ctx.profile_id()?;
    let mut rows = MessageRepository::find_thread::<DatabaseConnection>(
        me,
        params.counterpart_id,
        params.product_id,
        None,
    )
    .await?;

    let unread = unread_message_ids(me, &rows);
    if !unread.is_empty() {
        let marked = MessageRepository::mark_read::<DatabaseConnection>(unread, None).await?;
        debug!(profile_id = me, product_id = params.product_id, marked, "Thread marked read");
        rows.iter_mut()
            .filter(|m| m.receiver_id == me)
            .for_each(|m| m.is_read = true);
    }

    Ok(WebResponse::ok(rows))
}

async fn unread_count(ctx: RequestContext) -> WebResult<WebResponse<UnreadCount>> {
    let unread = MessageRepository::count_unread::<DatabaseConnection>(ctx.profile_id()?, None)
        .await?;
    Ok(WebResponse::ok(UnreadCount { unread }))
}
