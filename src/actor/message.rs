mod envelope;
mod event;
mod failure;
mod system_event;

pub use {self::envelope::*, self::event::*, self::failure::*, self::system_event::*};
