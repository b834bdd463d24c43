use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

/// Public feed of product transactions the seeder pulls from.
pub const DEFAULT_FEED_URL: &str =
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub feed_url: String,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")?,
            feed_url: env::var("FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string()),
        })
    }
}
