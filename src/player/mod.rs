//! Player sessions and actors.
//!
//! Each player runs as its own task with an mpsc press inbox. Presses
//! toggle selection tokens on the shared board; the third token submits
//! a claim and suspends the player until the dealer resumes it.

pub mod actor;
pub mod messages;
pub mod session;

pub use actor::{PlayerActor, PlayerHandle};
pub use messages::PlayerMessage;
pub use session::{Session, SessionView, SharedSession};
