//! Bot configuration: YAML sections ([`sections`]) plus env overrides ([`BotConfig`]).

mod bot_config;
mod sections;


pub use bot_config::{BotConfig, DEFAULT_CONFIG_FILE};
pub use sections::{
    BotMode, BotSection, DatabaseKind, DatabaseSection, ServerSection, WebAppSection,
    WebhookSection,
};
