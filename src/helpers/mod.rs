//! Helper functions shared by the resolver and context builder

mod date;
mod url;

pub use date::*;
pub use url::*;
