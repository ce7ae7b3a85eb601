//! Feed rendering: projection of message snapshots and read receipts

mod projector;
mod receipts;

pub use projector::{
    project, project_inverted, DateSeparator, DisplayItem, MessageBody, MessageItem,
    ProjectionContext,
};
pub use receipts::{pending_acknowledgement, receipt_for_latest, LatestReceipt};
