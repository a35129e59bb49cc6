//! Authentication and session management

pub mod clock;
pub mod models;
pub mod session;
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use models::{Credentials, LoginGrant, Role, TokenResponse, UserProfile};
pub use session::{Session, SessionStore, SESSION_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage};
