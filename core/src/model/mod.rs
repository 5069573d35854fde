pub mod entry;
pub mod goal;
pub mod lenient;
pub mod month;
