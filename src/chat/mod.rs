//! Chat module for relaychat.
//!
//! This module holds the client-side chat logic:
//! - Identity registration with the relay
//! - Room membership (advisory, one room at a time)
//! - Routing of drafts to a peer or a room
//! - The append-only log of received room messages
//! - Parsing of terminal input lines

mod command;
mod identity;
mod log;
mod room;
pub mod router;

pub use command::{format_help, get_command_help, parse_input, ChatCommand, ChatInput, CommandInfo};
pub use identity::IdentityRegistrar;
pub use log::{RoomMessageEntry, RoomMessageLog, EMPTY_LOG_PLACEHOLDER};
pub use room::RoomMembership;
pub use router::{Destination, OutboundDraft};
