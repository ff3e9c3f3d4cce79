pub mod constants;
pub mod string_utils;
pub mod time;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{flag_name, sampling, unique_id};
pub use time::now_millis;
pub use url_utils::{append_query_param, strip_query};
