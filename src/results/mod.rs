pub mod result_set;
pub mod row;
pub mod table;

pub use result_set::ResultSet;
pub use row::CustomDbRow;
pub use table::Table;
