pub mod a001_bill;
pub mod common;
