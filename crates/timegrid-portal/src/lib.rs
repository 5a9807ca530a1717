//! Portal adapter for Timegrid.
//!
//! Everything brittle about the third-party portal lives here: the fetch
//! sequence that coaxes the portal's own script into materialising its
//! dataset ([`PortalClient`]), an HTTP approximation of the rendered-page
//! contract ([`HttpPortalSession`]), and the plain-HTTP clients for the
//! non-timetable feeds ([`FeedClient`]). The decode logic itself is in
//! `timegrid-decode` and never touches the network.

mod client;
mod feeds;
mod http_session;

pub mod error;

pub use client::{PortalClient, PortalConfig};
pub use error::{Error, Result};
pub use feeds::{FeedClient, FeedEndpoints};
pub use http_session::{HttpPortalSession, HttpSessionConfig, HttpSessionFactory};
