pub mod archive;
pub mod prompt_parser;
pub mod workspace;
