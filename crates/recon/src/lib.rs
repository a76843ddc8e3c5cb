//! `skucheck-recon`: SKU verification engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns classified and
//! annotated tables. File access goes through [`engine::PipelineStages`].

pub mod channel;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;
pub mod partition;
pub mod table;

pub use config::{ChannelSet, VerifyConfig};
pub use engine::{run, verify, PipelineStages};
pub use error::{ErrorKind, VerifyError};
pub use model::{Outcome, Partitions, RunReport, RunSummary};
pub use table::{Table, Value};
