//! Built-in transition implementations.

mod blinds;
mod blink;
mod checkerboard;
mod crossfade;
mod explosion;
mod flip3d;
mod page_turn;
mod shake;
mod warp;

pub use blinds::Blinds;
pub use blink::Blink;
pub use checkerboard::Checkerboard;
pub use crossfade::Crossfade;
pub use explosion::Explosion;
pub use flip3d::Flip3d;
pub use page_turn::PageTurn;
pub use shake::Shake;
pub use warp::Warp;
