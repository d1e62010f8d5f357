pub mod analyze;
pub mod check;
pub mod export;
pub mod info;
pub mod run;
