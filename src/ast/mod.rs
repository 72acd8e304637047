//! Abstract syntax tree for mq programs.
//!
//! Nodes live in a flat arena ([`arena::Arena`]) and refer to each other
//! by [`arena::NodeId`] index rather than by owned pointers; a parsed
//! [`arena::Program`] is the arena plus the ordered root statements.

pub mod arena;
pub mod node;
pub mod print;
