pub mod action;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod promotion;
pub mod view;

pub use action::{Action, BulkKind, DEFAULT_APPROVE_COMMENT, DEFAULT_REJECT_COMMENT};
pub use client::{ActionOutcome, ClientConfig, PromotionClient};
pub use config::{ClientOverrides, PromoConfig, TokenStore};
pub use dashboard::{DashboardState, FetchOutcome, FetchTicket, ReviewDecision, ReviewDraft};
pub use error::{PromoError, Result};
pub use promotion::{
    BadgeTone, BulkResponse, CardAction, MutationResponse, Promotion, PromotionList,
    PromotionStatus, ServiceType,
};
pub use view::{ServiceFilter, SortOrder, Stats, Tab, ViewQuery};
