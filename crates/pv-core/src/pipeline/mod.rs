//! Pure transforms from the full item set to the page being rendered
//!
//! Every function here is referentially transparent: the controller feeds
//! them its current state and stores nothing they return except through
//! a new [`ViewState`](crate::state::ViewState).

mod filter;
mod lookup;
mod paginate;
mod stats;

pub use filter::filter_items;
pub use lookup::find_by_id;
pub use paginate::{clamp_page, paginate, total_pages, PageResult, DEFAULT_PER_PAGE};
pub use stats::{item_stats, ItemStats};
