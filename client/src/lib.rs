//! Client side of tasko: the REST API client, the session/task store, the
//! on-disk cache, and the filter/sort projections the dashboard renders.

pub mod alert;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod store;
pub mod view;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use store::{StoreSnapshot, TaskStore};
