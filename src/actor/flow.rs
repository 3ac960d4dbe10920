mod flow_ast;
mod flow_state;
mod interpreter;

pub use {self::flow_ast::*, self::flow_state::*, self::interpreter::*};
