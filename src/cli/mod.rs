pub mod args;
pub mod runner;

pub use args::{
    get_args, get_log_level_from_verbose, parse_assignment, Cli, Commands, CreateArgs, RenderArgs,
    RenderPart,
};
pub use runner::{run, Runner};
