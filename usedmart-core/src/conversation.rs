//! Groups a user's flat message rows into per-product conversations.

use std::collections::HashMap;
use usedmart_models::domain::prelude::MessageInfo;

/// A conversation is identified by the listing and the other participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub product_id: i32,
    pub counterpart_id: i32,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    pub key: ConversationKey,
    pub last_message: MessageInfo,
    pub unread_count: u64,
    /// Rows in input order.
    pub messages: Vec<MessageInfo>,
}

/// The other participant of `message` from `me`'s point of view.
#[inline]
pub fn counterpart_of(me: i32, message: &MessageInfo) -> i32 {
    if message.sender_id == me {
        message.receiver_id
    } else {
        message.sender_id
    }
}

#[inline]
fn involves(me: i32, message: &MessageInfo) -> bool {
    message.sender_id == me || message.receiver_id == me
}

#[inline]
fn is_unread_for(me: i32, message: &MessageInfo) -> bool {
    message.receiver_id == me && !message.is_read
}

/// Ordering used to pick the latest row. Equal timestamps fall back to the id.
#[inline]
fn recency(message: &MessageInfo) -> (Option<chrono::DateTime<chrono::Utc>>, i32) {
    (message.created_at, message.id)
}

/// Single pass over `rows`. Rows that do not involve `me` are ignored.
/// Conversations come back newest first.
pub fn group_conversations(me: i32, rows: Vec<MessageInfo>) -> Vec<Conversation> {
    let mut slots: HashMap<ConversationKey, usize> = HashMap::new();
    let mut conversations: Vec<Conversation> = Vec::new();

    for row in rows.into_iter().filter(|m| involves(me, m)) {
        let key = ConversationKey {
            product_id: row.product_id,
            counterpart_id: counterpart_of(me, &row),
        };
        let unread = u64::from(is_unread_for(me, &row));

        match slots.get(&key) {
            Some(&slot) => {
                let conversation = &mut conversations[slot];
                if recency(&row) >= recency(&conversation.last_message) {
                    conversation.last_message = row.clone();
                }
                conversation.unread_count += unread;
                conversation.messages.push(row);
            }
            None => {
                slots.insert(key, conversations.len());
                conversations.push(Conversation {
                    key,
                    last_message: row.clone(),
                    unread_count: unread,
                    messages: vec![row],
                });
            }
        }
    }

    conversations.sort_by(|a, b| recency(&b.last_message).cmp(&recency(&a.last_message)));
    conversations
}

/// Ids of the rows `me` received but has not read yet.
pub fn unread_message_ids(me: i32, rows: &[MessageInfo]) -> Vec<i32> {
    rows.iter()
        .filter(|m| is_unread_for(me, m))
        .map(|m| m.id)
        .collect()
}

/// Messages waiting for `me` across every conversation in `rows`.
pub fn total_unread(me: i32, rows: &[MessageInfo]) -> usize {
    rows.iter().filter(|m| is_unread_for(me, m)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const ME: i32 = 1;

    fn msg(id: i32, from: i32, to: i32, product: i32, secs: i64, read: bool) -> MessageInfo {
        MessageInfo {
            id,
            sender_id: from,
            receiver_id: to,
            product_id: product,
            content: format!("m{id}"),
            is_read: read,
            created_at: Some(Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()),
        }
    }

    fn sample() -> Vec<MessageInfo> {
        vec![
            msg(1, 2, ME, 10, 5, true),
            msg(2, ME, 2, 10, 10, false),
            msg(3, 2, ME, 10, 20, false),
            msg(4, 3, ME, 10, 7, false),
            msg(5, ME, 3, 11, 30, false),
            msg(6, 2, ME, 11, 1, false),
            msg(7, 2, ME, 10, 15, false),
        ]
    }

    fn find(conversations: &[Conversation], product: i32, counterpart: i32) -> &Conversation {
        conversations
            .iter()
            .find(|c| c.key.product_id == product && c.key.counterpart_id == counterpart)
            .unwrap()
    }

    #[test]
    fn test_groups_by_product_and_counterpart() {
        let conversations = group_conversations(ME, sample());
        assert_eq!(conversations.len(), 4);

        let with_2_on_10 = find(&conversations, 10, 2);
        let mut ids: Vec<i32> = with_2_on_10.messages.iter().map(|m| m.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 7]);
        assert_eq!(find(&conversations, 11, 3).messages.len(), 1);
    }

    #[test]
    fn test_every_row_lands_in_exactly_one_group() {
        let rows = sample();
        let conversations = group_conversations(ME, rows.clone());
        let total: usize = conversations.iter().map(|c| c.messages.len()).sum();
        assert_eq!(total, rows.len());
        for row in &rows {
            let holders = conversations
                .iter()
                .filter(|c| c.messages.iter().any(|m| m.id == row.id))
                .count();
            assert_eq!(holders, 1, "row {} is in {holders} groups", row.id);
        }
    }

    #[test]
    fn test_latest_message_has_max_timestamp() {
        for c in group_conversations(ME, sample()) {
            let max = c.messages.iter().map(|m| m.created_at).max().unwrap();
            assert_eq!(c.last_message.created_at, max);
        }
        let conversations = group_conversations(ME, sample());
        assert_eq!(find(&conversations, 10, 2).last_message.id, 3);
    }

    #[test]
    fn test_unread_counts_only_incoming_unread_rows() {
        let conversations = group_conversations(ME, sample());
        // m1 is read, m2 was sent by me
        assert_eq!(find(&conversations, 10, 2).unread_count, 2);
        assert_eq!(find(&conversations, 10, 3).unread_count, 1);
        assert_eq!(find(&conversations, 11, 3).unread_count, 0);
        assert_eq!(find(&conversations, 11, 2).unread_count, 1);

        let total: u64 = conversations.iter().map(|c| c.unread_count).sum();
        assert_eq!(total as usize, total_unread(ME, &sample()));
    }

    #[test]
    fn test_sorted_newest_first() {
        let conversations = group_conversations(ME, sample());
        let order: Vec<(i32, i32)> = conversations
            .iter()
            .map(|c| (c.key.product_id, c.key.counterpart_id))
            .collect();
        assert_eq!(order, vec![(11, 3), (10, 2), (10, 3), (11, 2)]);
    }

    #[test]
    fn test_timestamp_tie_prefers_later_row() {
        let rows = vec![msg(1, 2, ME, 10, 5, false), msg(2, ME, 2, 10, 5, false)];
        let conversations = group_conversations(ME, rows);
        assert_eq!(conversations[0].last_message.id, 2);
    }

    #[test]
    fn test_rows_of_other_users_are_ignored() {
        let rows = vec![msg(1, 4, 5, 10, 0, false), msg(2, 2, ME, 10, 1, false)];
        let conversations = group_conversations(ME, rows);
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].key.counterpart_id, 2);
    }

    #[test]
    fn test_unread_ids_of_one_thread() {
        let rows: Vec<MessageInfo> = sample()
            .into_iter()
            .filter(|m| m.product_id == 10 && counterpart_of(ME, m) == 2)
            .collect();
        let mut ids = unread_message_ids(ME, &rows);
        ids.sort();
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_conversations(ME, Vec::new()).is_empty());
        assert_eq!(total_unread(ME, &[]), 0);
    }
}
