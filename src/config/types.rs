use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Directory the external encoder writes segment and index files into.
    #[serde(default = "default_media_dir")]
    pub dir: PathBuf,

    /// Base path prepended to file names in notification events. Viewers
    /// resolve event paths against the server's base URL.
    #[serde(default = "default_public_base")]
    pub public_base: String,

    /// File-name prefix of the live index playlists ("current index"
    /// naming convention).
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    4000
}
fn default_media_dir() -> PathBuf {
    PathBuf::from("./videos/ipcam")
}
fn default_public_base() -> String {
    "/videos/ipcam".to_string()
}
fn default_index_prefix() -> String {
    "index".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: default_media_dir(),
            public_base: default_public_base(),
            index_prefix: default_index_prefix(),
        }
    }
}
