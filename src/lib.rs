pub mod align;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod schedule;
