//! Record schemas for Registrar
//!
//! One flat document type per entity kind. The serde form is shared
//! between the wire and the store.

mod article;
mod dining_commons_menu_item;
mod help_request;
mod menu_item_review;
mod organization;
mod recommendation_request;

pub use article::{Article, ARTICLE_COLLECTION};
pub use dining_commons_menu_item::{UcsbDiningCommonsMenuItem, DINING_COMMONS_MENU_ITEM_COLLECTION};
pub use help_request::{HelpRequest, HELP_REQUEST_COLLECTION};
pub use menu_item_review::{MenuItemReview, MENU_ITEM_REVIEW_COLLECTION};
pub use organization::{UcsbOrganization, ORGANIZATION_COLLECTION};
pub use recommendation_request::{RecommendationRequest, RECOMMENDATION_REQUEST_COLLECTION};
