pub use self::{board::*, kicks::*, piece::*};

pub(crate) mod board;
pub(crate) mod kicks;
pub(crate) mod piece;
