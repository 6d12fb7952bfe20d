//! Repository layer — entity-scoped database operations.
//!
//! Plain functions over `&rusqlite::Connection`, one module per table.
//! All public functions are re-exported here.

mod academic_year;
mod aid_record;
mod assignment;
mod category;
mod direction;
mod group;
mod school;
mod student;
mod template_variable;

pub use academic_year::*;
pub use aid_record::*;
pub use assignment::*;
pub use category::*;
pub use direction::*;
pub use group::*;
pub use school::*;
pub use student::*;
pub use template_variable::*;
