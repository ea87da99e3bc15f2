pub mod fetch;
mod handle;
pub mod filter;
pub mod models;
pub mod time;

pub use filter::{view, ViewFilter};
pub use handle::CalendarHandle;
pub use models::CalendarEvent;
