use serde::{Deserialize, Serialize};

mod cursor;

pub use cursor::PageCursor;

/// Direction of a single-step page navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageDirection {
    Previous,
    Next,
}
