pub use self::{field::*, field_analysis::*, piece::*};

pub(crate) mod field;
pub(crate) mod field_analysis;
pub(crate) mod piece;

const FIELD_WIDTH: usize = 10;
const FIELD_HEIGHT: usize = 20;
