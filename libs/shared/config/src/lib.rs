use std::env;
use tracing::warn;

const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_HOSPITAL_REGISTRY_URL: &str =
    "https://api.data.gov.in/resource/98fa254e-c5f8-4910-a19b-4828939b477d";
const DEFAULT_NUTRITIONIX_BASE_URL: &str = "https://trackapi.nutritionix.com/v2";
const DEFAULT_CORS_ORIGINS: &str = "https://medico-healthcare.vercel.app,http://localhost:5173";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_api_key: String,
    pub jwt_secret: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub cloudinary_base_url: String,
    pub hospital_registry_url: String,
    pub hospital_api_key: String,
    pub nutritionix_base_url: String,
    pub nutritionix_app_id: String,
    pub nutritionix_api_key: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub production: bool,
}

fn var_or_empty(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", name);
        String::new()
    })
}

fn var_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("{} not set, using default", name);
        default.to_string()
    })
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or_else(|| {
                warn!("PORT not set or invalid, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            });

        let config = Self {
            supabase_url: var_or_empty("SUPABASE_URL"),
            supabase_api_key: var_or_empty("SUPABASE_API_KEY"),
            jwt_secret: var_or_empty("JWT_SECRET"),
            cloudinary_cloud_name: var_or_empty("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: var_or_empty("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: var_or_empty("CLOUDINARY_API_SECRET"),
            cloudinary_base_url: var_or_default("CLOUDINARY_BASE_URL", DEFAULT_CLOUDINARY_BASE_URL),
            hospital_registry_url: var_or_default("HOSPITAL_REGISTRY_URL", DEFAULT_HOSPITAL_REGISTRY_URL),
            hospital_api_key: var_or_empty("HOSPITAL_API_KEY"),
            nutritionix_base_url: var_or_default("NUTRITIONIX_BASE_URL", DEFAULT_NUTRITIONIX_BASE_URL),
            nutritionix_app_id: var_or_empty("NUTRITIONIX_APP_ID"),
            nutritionix_api_key: var_or_empty("NUTRITIONIX_API_KEY"),
            port,
            cors_origins: parse_origins(&var_or_default("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
            production: env::var("APP_ENV").map(|v| v == "production").unwrap_or(false),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_api_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_media_configured(&self) -> bool {
        !self.cloudinary_cloud_name.is_empty()
            && !self.cloudinary_api_key.is_empty()
            && !self.cloudinary_api_secret.is_empty()
    }

    pub fn is_nutrition_configured(&self) -> bool {
        !self.nutritionix_app_id.is_empty() && !self.nutritionix_api_key.is_empty()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_media_configuration_requires_all_credentials() {
        let mut config = AppConfig {
            supabase_url: "http://localhost".to_string(),
            supabase_api_key: "key".to_string(),
            jwt_secret: "secret".to_string(),
            cloudinary_cloud_name: "demo".to_string(),
            cloudinary_api_key: "123".to_string(),
            cloudinary_api_secret: String::new(),
            cloudinary_base_url: DEFAULT_CLOUDINARY_BASE_URL.to_string(),
            hospital_registry_url: DEFAULT_HOSPITAL_REGISTRY_URL.to_string(),
            hospital_api_key: String::new(),
            nutritionix_base_url: DEFAULT_NUTRITIONIX_BASE_URL.to_string(),
            nutritionix_app_id: String::new(),
            nutritionix_api_key: String::new(),
            port: DEFAULT_PORT,
            cors_origins: vec![],
            production: false,
        };

        assert!(config.is_configured());
        assert!(!config.is_media_configured());
        config.cloudinary_api_secret = "shh".to_string();
        assert!(config.is_media_configured());
        assert!(!config.is_nutrition_configured());
    }
}
