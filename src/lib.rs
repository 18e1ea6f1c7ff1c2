//! Coffee Journey domain core.
//!
//! Everything the HTTP layer needs to manage coffee entries without knowing
//! how they are persisted:
//!
//! - [`CoffeeFields`] / [`CoffeeRecord`]: the writable fields and the stored,
//!   wire-serializable record.
//! - [`parse_price`] / [`parse_id`]: the input rules, run before any write.
//! - [`CoffeeStore`]: the document store, with an in-memory backend and a
//!   MongoDB backend behind the `mongo` feature.
//! - [`BlobStore`]: image storage keyed by record id, backed by a local
//!   directory.
//!
//! ## Invariants worth knowing
//!
//! - Ids are assigned by the store and never change.
//! - A stored price has at most two fractional digits and keeps its scale,
//!   so `"12.30"` comes back as `"12.30"`.
//! - The record write and the image write are separate operations; nothing
//!   here makes them atomic.

mod blob;
mod decimal;
mod error;
mod model;
mod store;
mod validate;

pub use crate::blob::{BlobStore, FileBlobStore};
pub use crate::decimal::{from_decimal128, to_decimal128};
pub use crate::error::{BlobError, BlobResult, StoreError, StoreResult, ValidationError};
pub use crate::model::{CoffeeFields, CoffeeRecord};
pub use crate::store::{CoffeeStore, MemoryStore, StoreBackend, StoreConfig};
#[cfg(feature = "mongo")]
pub use crate::store::MongoStore;
pub use crate::validate::{parse_id, parse_price, required, MAX_PRICE_SCALE};

pub use bson::oid::ObjectId;
pub use bytes::Bytes;
pub use rust_decimal::Decimal;
