//! panedrive-core: pure logic for pane addressing and completion detection.
//! No IO: the tmux boundary lives in `panedrive-tmux`.

pub mod address;
pub mod completion;

pub use address::{Address, AddressError};
pub use completion::{
    CompletionMarker, CompletionState, ECHO_SEPARATOR, classify, compose_command, warmup_delay,
};
