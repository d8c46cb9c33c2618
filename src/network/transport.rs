use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::error::ChannelError;

pub type SocketStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const SOCKET_IO_PATH: &str = "/socket.io/";
const SOCKET_IO_QUERY: &str = "EIO=4&transport=websocket";

/// Maps a configured base address such as `http://localhost:5000` onto the
/// Socket.IO websocket endpoint.
pub fn build_endpoint(server_url: &str) -> Result<Url, ChannelError> {
    let mut url = Url::parse(server_url).map_err(|source| ChannelError::InvalidAddress {
        address: server_url.to_string(),
        source,
    })?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(ChannelError::UnsupportedScheme(other.to_string())),
    };
    url.set_scheme(scheme)
        .map_err(|_| ChannelError::UnsupportedScheme(url.scheme().to_string()))?;

    url.set_path(SOCKET_IO_PATH);
    url.set_query(Some(SOCKET_IO_QUERY));
    url.set_fragment(None);

    Ok(url)
}

pub async fn open_transport(endpoint: &Url) -> Result<SocketStream, ChannelError> {
    let (stream, response) = connect_async(endpoint.as_str()).await?;
    log::debug!("Websocket upgrade completed with status {}", response.status());
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_http_base_address() {
        let url = build_endpoint("http://localhost:5000").expect("endpoint");
        assert_eq!(
            url.as_str(),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn rewrites_https_and_keeps_secure_websocket() {
        let url = build_endpoint("https://chat.example.com/app?x=1#top").expect("endpoint");
        assert_eq!(
            url.as_str(),
            "wss://chat.example.com/socket.io/?EIO=4&transport=websocket"
        );

        let url = build_endpoint("wss://chat.example.com").expect("endpoint");
        assert_eq!(url.scheme(), "wss");
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(matches!(
            build_endpoint("not a url"),
            Err(ChannelError::InvalidAddress { .. })
        ));
        assert!(matches!(
            build_endpoint("ftp://localhost:5000"),
            Err(ChannelError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[tokio::test]
    async fn secure_endpoint_attempts_a_tls_handshake() {
        use tokio::net::TcpListener;
        use tokio_tungstenite::tungstenite::Error as WsError;
        use tokio_tungstenite::tungstenite::error::UrlError;

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            // Plain TCP peer: accept and hang up mid-handshake.
            if let Ok((socket, _)) = listener.accept().await {
                drop(socket);
            }
        });

        let endpoint = build_endpoint(&format!("https://127.0.0.1:{port}")).expect("endpoint");
        let result = open_transport(&endpoint).await;

        assert!(result.is_err());
        assert!(!matches!(
            result,
            Err(ChannelError::Transport(WsError::Url(UrlError::TlsFeatureNotEnabled)))
        ));
    }
}
