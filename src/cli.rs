use crate::chat_client::DEFAULT_SERVER_URL;
use crate::ui_server::DEFAULT_UI_BIND;
use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Browser chat client for a Gemini chat backend", long_about = None)]
pub struct Args {
    /// chat backend base URL
    #[arg(env = "GEMINI_CHAT_SERVER_URL", long, default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// address the chat page is served on
    #[arg(env = "GEMINI_CHAT_UI_BIND", long, default_value = DEFAULT_UI_BIND)]
    pub ui_bind: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "gemini-chat",
            "--server-url",
            "http://10.0.0.2:8080",
            "--ui-bind",
            "0.0.0.0:4000",
        ])
        .unwrap();
        assert_eq!(args.server_url, "http://10.0.0.2:8080");
        assert_eq!(args.ui_bind, "0.0.0.0:4000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        assert!(Args::try_parse_from(["gemini-chat", "--ui-bind", "nowhere"]).is_err());
    }
}
