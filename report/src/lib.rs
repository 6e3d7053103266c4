mod output;
pub use output::{ensure_dir, read_column, write_csv, write_json, Row};
mod summary;
pub use summary::Summary;
mod tally;
pub use tally::Tally;
