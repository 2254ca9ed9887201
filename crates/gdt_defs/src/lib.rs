//! Declaration generator: turns the Godot XML class reference into the
//! TypeScript ambient declaration files a transpiled project compiles
//! against.
//!
//! Generation runs in two phases. Phase one parses the global scope
//! reference and freezes the set of singleton names; phase two generates
//! every class file against that set, since singleton classes must declare
//! under a suffixed name. A malformed reference file fails only its own
//! generation; the caller decides whether to continue with the rest.

pub mod bases;
pub mod class_file;
pub mod gdscript_lib;
pub mod global_scope;
pub mod method;
pub mod util;

pub use bases::base_definitions;
pub use class_file::{generate_class_file, ClassFile};
pub use gdscript_lib::generate_global_functions;
pub use global_scope::{parse_global_scope, GlobalScope, SingletonSet};
