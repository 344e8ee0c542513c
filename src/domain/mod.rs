pub mod borrow;
pub mod catalog;
pub mod errors;
pub mod member;
pub mod reading;
pub mod report;
pub mod value_objects;

pub use borrow::*;
pub use errors::*;
pub use value_objects::*;
