pub mod academic_year;
pub mod aid_record;
pub mod category;
pub mod direction;
pub mod enums;
pub mod filters;
pub mod group;
pub mod school;
pub mod student;
pub mod template_variable;

pub use academic_year::*;
pub use aid_record::*;
pub use category::*;
pub use direction::*;
pub use filters::*;
pub use group::*;
pub use school::*;
pub use student::*;
pub use template_variable::*;
