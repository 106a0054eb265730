pub mod table_row;
pub mod username;

pub use table_row::{ExtractedResults, RawRow, RowOutcome, StatusMarkers};
pub use username::{normalize, Username};
