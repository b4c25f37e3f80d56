//! Shared helpers: dates, HTML escaping, MIME types, pluralization.

pub mod date;
pub mod html;
pub mod mime;
pub mod plural;
