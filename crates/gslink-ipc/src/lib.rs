//! # gslink-ipc
//!
//! The filesystem channel between the game and gslink. The game cannot open
//! sockets, so it drops JSON request files into `<base>/requests/` and polls
//! `<base>/responses/` for `<id>.json`.
//!
//! - **Watcher**: [`watcher`] turns `notify` events into [`RawEvent`]s
//! - **Write stabilizer**: [`stabilizer`] waits until a file holds complete JSON
//! - **Worker**: classifies each completed file and feeds the [`RequestQueue`]
//! - **Responses**: [`ResponseWriter`] publishes replies atomically
//!
//! ```ignore
//! let (ipc, mut queue) = Ipc::start(&IpcConfig::new(settings.ipc_dir()))?;
//! while let Some(request) = queue.recv().await {
//!     let _ = ipc.write_response(request.id(), &serde_json::json!({}))?;
//! }
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
mod ipc;
pub mod queue;
pub mod response;
pub mod stabilizer;
pub mod watcher;
mod worker;

pub use config::{IpcConfig, REQUESTS_DIR, RESPONSES_DIR, is_request_file};
pub use errors::{IpcError, ResponseError, Result};
pub use ipc::Ipc;
pub use queue::{RequestQueue, TryRecvError};
pub use response::ResponseWriter;
pub use stabilizer::{FileStamp, FileState, WriteStabilizer};
pub use watcher::{RawEvent, RawEventKind};
