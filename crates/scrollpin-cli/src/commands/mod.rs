pub mod config;
pub mod page;
pub mod run;
pub mod seek;
pub mod trace;
