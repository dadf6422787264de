//! Domain model types.
//!
//! The vocabulary shared with the execution layer: the configuration record,
//! its append-only history record, and the table/projection constants the
//! dialect builders emit. Confsql never materializes these from rows itself —
//! that is the execution layer's job — but the column lists the generated SQL
//! selects are defined here, next to the structs they hydrate.

mod history;
mod record;

pub use history::{HistoryRecord, OpType};
pub use record::ConfigRecord;
