pub mod annotations;
pub mod merge;
pub mod parse;
