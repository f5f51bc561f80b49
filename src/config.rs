use clap::Parser;
use once_cell::sync::Lazy;

/// Length of the bearer tokens handed out at login
pub const AUTH_TOKEN_LENGTH: usize = 48;

/// Public URL prefix under which rendered certificates are served
pub const CERTIFICATE_PUBLIC_PREFIX: &str = "/certificates";

pub static APP_CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,

    /// Organisation code printed at the start of every certificate number
    #[clap(long, env, default_value = "LMS")]
    pub certificate_prefix: String,

    #[clap(long, env, default_value_t = 5)]
    pub certificate_validity_years: u32,

    /// Final score a completed enrollment needs before a certificate is issued
    #[clap(long, env, default_value_t = 5)]
    pub certificate_min_score: i32,

    #[clap(long, env, default_value = "assets/certificate_template.png")]
    pub certificate_template_path: String,

    #[clap(long, env, default_value = "assets/fonts/certificate.ttf")]
    pub certificate_font_path: String,

    #[clap(long, env, default_value = "public/certificates")]
    pub certificate_output_dir: String,
}
