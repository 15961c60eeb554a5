//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! Receive all data as struct fields and are rebuilt each frame:
//! - `TitleBar`: app name, page, usage counter, status
//! - `Heading`: page tabs and description
//! - `MessageCard`: one transcript entry rendered as Markdown
//!
//! ## Stateful Components (Event-Driven)
//!
//! Keep local presentation state in `TuiState` and emit events:
//! - `InputBox`: the prompt field
//! - `MessageList`: scrollable newest-first transcript with height caching
//!
//! Each file holds the component's state, events, rendering, and tests.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status line)
//! ├── heading.rs       (page tabs + description)
//! ├── input_box.rs     (prompt field)
//! ├── message.rs       (single transcript card)
//! └── message_list.rs  (scrollable transcript)
//! ```

mod heading;
mod title_bar;
pub use heading::{HEADING_HEIGHT, Heading};
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
