mod join_quiz;
mod lookup_quiz;
mod register_participation;
mod resolve_session;
mod watch_quiz_start;

pub use join_quiz::*;
pub use lookup_quiz::*;
pub use register_participation::*;
pub use resolve_session::*;
pub use watch_quiz_start::*;
