//! Named-matrix stack.
//!
//! A registry of 4x4 matrices addressable by name, with a bind-then-mutate
//! protocol: `bind` selects the mutation target, subsequent operations act on
//! that entry until another name is bound. The selection lives inside the
//! registry value, not in process-global state.

mod registry;

pub use registry::MatrixRegistry;
