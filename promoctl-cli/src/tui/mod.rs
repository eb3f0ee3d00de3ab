//! Interactive promotions dashboard
//!
//! Tabs per approval status, live search and service/sort filters over the
//! loaded list, multi-select with bulk actions, and a review modal for
//! approving or rejecting with a comment.

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use terminal::run;
