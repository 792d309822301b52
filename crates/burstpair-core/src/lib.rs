pub mod consts;
pub mod error;
pub mod frame;
pub mod filters;
pub mod io;
pub mod align;
pub mod stack;
pub mod pipeline;
