pub mod process;
pub mod run;
pub mod validate;
