#[derive(Debug)]
pub struct ClientConfig {
    pub server_url: String,
    pub audio_file: String,
}

impl ClientConfig {
    pub fn new(server_url: String, audio_file: String) -> Self {
        Self {
            server_url,
            audio_file,
        }
    }
}
