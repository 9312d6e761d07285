pub mod bulk;
pub mod common;
pub mod copy;
pub mod delete;
pub mod list;

pub use bulk::Bulk;
pub use common::CommandOptions;
pub use copy::Copy;
pub use delete::Delete;
pub use list::List;
