// Configuration for the server

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 5174;
pub const DEFAULT_VOICE_MODEL: &str = "piper-voices/en_US-lessac-medium.onnx";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// `.onnx` voice model; its `.onnx.json` config must sit next to it.
    pub voice_model: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), &install_dir())
    }

    /// Build from an arbitrary variable source. Relative model paths are
    /// resolved against `base_dir`.
    pub fn from_lookup<F>(lookup: F, base_dir: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let voice_model = lookup("VOICE_MODEL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VOICE_MODEL.to_string());

        Self {
            port,
            voice_model: resolve_against(base_dir, Path::new(&voice_model)),
        }
    }

    /// The server only ever listens on loopback.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), self.port)
    }
}

/// Directory holding the running executable, falling back to the working directory.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_against(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
