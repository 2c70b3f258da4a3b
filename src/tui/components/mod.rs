//! # TUI Components
//!
//! Components follow two patterns:
//!
//! - **Stateless (props-based)**: receive all data as parameters and just
//!   render (the status/tab bars in `ui.rs`).
//! - **Stateful (event-driven)**: a persistent `*State` struct lives in
//!   `TuiState`, a transient wrapper borrows it each frame, and
//!   `handle_event` turns low-level `TuiEvent`s into high-level intents.
//!
//! Each component file co-locates its state, events, rendering, and tests.
//! Components never reach into `App` directly - dependencies come in as
//! borrowed props, which keeps them testable without a terminal.

pub mod input_line;
pub mod notification_feed;
pub mod search_panel;
pub mod session_list;
pub mod slot_picker;

pub use input_line::{InputEvent, InputLine};
pub use notification_feed::{FeedEvent, NotificationFeedState, NotificationList};
pub use search_panel::{SearchEvent, SearchPanel, SearchPanelState};
pub use session_list::{SessionList, SessionListEvent, SessionListState};
pub use slot_picker::{SlotPicker, SlotPickerEvent, SlotPickerState};
