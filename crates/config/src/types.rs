//! Core configuration types.

mod entry;
mod environment;
mod value;

pub use entry::{DefaultValue, Entry};
pub use environment::{
    Environment, ambient_environment, env_var_or_none, namespace_of, override_var_name,
};
pub use value::ConfigValue;
