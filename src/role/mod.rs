//! Markers.
//!
//! Markers are used to apply different strategies as a client or server.
//! `Endpoint<IO, Server>::accept` returns a `Connection` whose writer never
//! masks, while a `FrameWriter<IO, Client>` masks every frame it sends.
//!
//! Both client and server meet [`RoleHelper`], which decides how outbound
//! payload data is masked. Only client meets [`ClientRole`], and only server
//! meets [`ServerRole`].

mod client;
mod server;

pub use client::Client;
pub use server::Server;

use crate::frame::Mask;

/// Client or Server marker.
pub trait RoleHelper {
    /// Mask applied to the next outbound frame.
    fn write_mask() -> Mask;
}

/// Client marker.
pub trait ClientRole: RoleHelper {}

/// Server marker.
pub trait ServerRole: RoleHelper {}
