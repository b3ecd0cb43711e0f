/// Entity ids are assigned by the ledger from monotonically increasing counters.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
