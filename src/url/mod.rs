//! URL handling module for Title Grabber
//!
//! This module finds URLs in free-form input lines and knows the rules for the
//! one social-media host whose permalink pages get special treatment.

mod extract;
mod social;

pub use extract::{extract_url, is_url_shaped};
pub use social::{is_status_permalink, path_depth, SocialHost, TWITTER_HOST};
