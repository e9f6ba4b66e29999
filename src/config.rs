use std::env;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Actor id of the platform treasury wallet. Sheet settlements credit
    /// this actor's earnings; deployments configure it, the code never
    /// assumes a fixed id.
    pub treasury_user_id: i64,
    /// FCM server key for push delivery. Absent means push dispatch is a
    /// no-op.
    pub fcm_server_key: Option<String>,
    pub fcm_endpoint: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let host = env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8094".to_string())
            .parse()
            .map_err(|_| "PORT must be a valid u16".to_string())?;

        let treasury_user_id: i64 = env::var("TREASURY_USER_ID")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|_| "TREASURY_USER_ID must be a valid i64".to_string())?;

        let fcm_server_key = env::var("FCM_SERVER_KEY").ok().filter(|k| !k.is_empty());

        let fcm_endpoint = env::var("FCM_ENDPOINT")
            .unwrap_or_else(|_| "https://fcm.googleapis.com/fcm/send".to_string());

        Ok(Config {
            database_url,
            host,
            port,
            treasury_user_id,
            fcm_server_key,
            fcm_endpoint,
        })
    }
}
