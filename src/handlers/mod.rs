mod boot;
mod introduction;

pub use boot::{on_cache_ready, on_ready};
pub use introduction::on_member_update;
