//! Panel client: HTTP adapter for the batch backend and the background runner
//! that executes calls and the progress poll timer.
mod backend;
mod runner;
mod types;

pub use backend::{Backend, ClientSettings, ReqwestBackend};
pub use runner::{ClientEvent, ClientHandle, Request};
pub use types::{
    ClientError, FailureKind, ProgressPayload, ResultPayload, StartAck, StopAck,
};
