//! Participant sessions for Township.
//!
//! A session is the live binding between a participant and the two
//! secrets it holds while connected:
//!
//! 1. **Credential token**: minted here ([`generate_token`]) and used by
//!    the transport to recognize inbound requests.
//! 2. **Video token**: obtained from an injected [`VideoProvisioner`],
//!    scoped to one room and one participant.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room layer (above)  ← owns a SessionRegistry per room
//!     ↕
//! Session layer (this crate)  ← sessions, tokens, provisioning seam
//!     ↕
//! Protocol layer (below)  ← ParticipantId, RoomId
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod provision;
mod registry;
mod session;

pub use error::SessionError;
pub use provision::{DevProvisioner, VideoProvisioner};
pub use registry::{generate_token, SessionRegistry};
pub use session::Session;
