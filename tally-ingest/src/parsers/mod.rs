pub mod wells_fargo;

pub use wells_fargo::{parse_statement, parse_wells_fargo_text};
