mod log_entry;
mod websvn_url;

pub use log_entry::*;
pub use websvn_url::*;
