mod clock;
mod engine;
mod ticker;

pub use clock::{format_time, NO_TIMER_PLACEHOLDER};
pub use engine::{TurnEngine, TurnState, TurnView};
pub use ticker::Ticker;
