use envconfig::Envconfig;

#[derive(Envconfig)]
pub struct Config {
    #[envconfig(from = "LISTEN_ADDRESS", default = "0.0.0.0:8989")]
    pub listen_address: String,

    #[envconfig(from = "GOOGLE_SERVICE_ACCOUNT_EMAIL", default = "")]
    pub service_account_email: String,

    #[envconfig(from = "GOOGLE_PRIVATE_KEY", default = "")]
    pub private_key: String,

    #[envconfig(from = "GOOGLE_DRIVE_FOLDER_ID", default = "")]
    pub folder_id: String,

    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "300")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn storage(&self) -> StorageConfig {
        StorageConfig {
            service_account_email: self.service_account_email.clone(),
            private_key: self.private_key.clone(),
            folder_id: self.folder_id.clone(),
        }
    }
}

/// Credentials and destination for the storage backend. Values may be empty;
/// that is only reported when a client is built.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub service_account_email: String,
    pub private_key: String,
    pub folder_id: String,
}
