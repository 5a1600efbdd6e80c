pub mod conversation;
pub mod listing;
pub mod market;
pub mod ordering;
pub mod rules;
pub mod view_gate;

pub use conversation::{group_conversations, total_unread, unread_message_ids, Conversation};
pub use market::MarketSettings;
pub use rules::RuleError;
pub use view_gate::{ViewCounter, ViewGate, ViewMarkerStore, ViewOutcome, ViewRequest};
