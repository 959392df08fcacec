mod booking;
mod directory;
mod primitives;

pub use booking::*;
pub use directory::*;
pub use primitives::*;
