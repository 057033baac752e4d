//! Session bounded context - the two call slots and everything that moves
//! calls between them

pub mod directory;
pub mod manager;
pub mod observer;

pub use directory::{Contact, ContactDirectory};
pub use manager::{CallSessionManager, SessionSnapshot};
pub use observer::SessionObserver;
