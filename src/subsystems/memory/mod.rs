//! Memory subsystem: what Tawfiq writes to disk.
//!
//! The only persisted state is the query log: every user utterance appended
//! as one line of `user_queries.txt` under the configured work dir.
//!
//! ```text
//! {work_dir}/
//! └── user_queries.txt
//! ```

pub mod query_log;

pub use query_log::QueryLog;
