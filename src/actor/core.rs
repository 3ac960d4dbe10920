mod behavior;
mod delivery_error;
mod error_reason;
mod process;

pub use {self::behavior::*, self::delivery_error::*, self::error_reason::*, self::process::*};
