mod config;
mod help;
mod run;

pub use run::cmd_run;
