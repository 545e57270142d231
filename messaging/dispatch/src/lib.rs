//! Message dispatch for the inter-task substrate
//!
//! Ties the layers together: a [`Session`] drives one transport's read loop,
//! decoding envelopes against a shared [`MessageCatalog`], resolving port
//! addresses through the [`EndpointResolver`], and delivering to handlers
//! registered in the [`DispatchRouter`].
//!
//! Startup order for a task: build the catalog, register handlers, register
//! known endpoints, connect a transport, then spawn `Session::run`.

pub mod config;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod router;
pub mod session;

pub use config::{SessionConfig, SessionSettings, TransportConfig};
pub use error::{DispatchError, Result};
pub use resolver::{EndpointContext, EndpointResolver};
pub use router::{DispatchOutcome, DispatchRouter, MessageHandler};
pub use session::{Session, SessionMetrics};

pub use nemo_codec::MessageCatalog;
