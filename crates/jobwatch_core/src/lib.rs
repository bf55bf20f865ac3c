//! Jobwatch core: status map, table renderer and the pure poll state machine.
mod effect;
mod msg;
mod render;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, PollFailure};
pub use render::{escape_text, render, RenderTarget, TableBody, TableRow, JOBS_BODY_ID};
pub use state::{AppState, PollSeq, PollSettings};
pub use status::{DecodeError, StatusMap};
pub use update::update;
pub use view_model::AppViewModel;
