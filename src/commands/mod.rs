mod common;
mod init;
mod run;

pub use init::{InitArgs, init_config};
pub use run::{RunArgs, run_pipeline};
