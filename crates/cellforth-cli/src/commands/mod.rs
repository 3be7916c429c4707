pub mod check;
pub mod layout;
pub mod run;
pub mod script;
pub mod trace;
