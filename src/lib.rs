pub mod lix;
pub mod program_file;
pub mod rex;
pub mod translate;
pub mod types;
