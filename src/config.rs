/// Monthly GeoLite2 City database (gzip-compressed MMDB).
pub const GEOLITE2_CITY_URL: &str =
    "http://geolite.maxmind.com/download/geoip/database/GeoLite2-City.mmdb.gz";

/// MD5 checksum published next to [`GEOLITE2_CITY_URL`].
pub const GEOLITE2_CITY_MD5_URL: &str =
    "http://geolite.maxmind.com/download/geoip/database/GeoLite2-City.md5";

const DEFAULT_DB_PATH: &str = "GeoLite2-City.mmdb";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let db_path = std::env::var("GEOREADER_DB_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config { db_path, debug })
}
