pub mod guild_config;
pub mod monitored_roles;

mod r#impl;
