pub mod crop;
pub mod image_io;
pub mod output;
pub mod preview;
pub mod sequence;
