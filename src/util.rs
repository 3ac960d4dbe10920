pub mod count_down_latch;
pub mod signal;

pub use {self::count_down_latch::*, self::signal::*};
