mod remote_call;

pub use remote_call::{call_with_timeout, dedupe_product_ids};
