pub mod store;

pub use store::{with_session, DataStore, PgSession, PgStore, QueryParam, StoreSession};
