pub mod digest;
pub mod random;
pub mod time;

pub use digest::{digest_said, saidify, saidify_fields, DUMMY_SAID};
pub use random::{random_nonce, random_passcode};
pub use time::{create_timestamp, format_timestamp};
