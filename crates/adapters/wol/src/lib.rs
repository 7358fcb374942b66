//! # nexus-adapter-wol
//!
//! Wake-on-LAN adapter — terminal handler for `wol:MAC:BROADCAST` actions.
//!
//! The scheme-specific part is twelve hex digits of the MAC address followed
//! by the IPv4 broadcast address, e.g. `wol:001122aabbcc:192.168.1.255`.
//! The magic packet is six `0xFF` bytes followed by the MAC repeated sixteen
//! times.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `nexus-app` and `nexus-domain`.

mod config;
mod error;

pub use config::WolConfig;
pub use error::WolError;

use std::net::{Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use nexus_app::ports::TerminalHandler;
use nexus_domain::action::Action;
use nexus_domain::error::ResolveError;
use tokio::net::UdpSocket;

/// Registry key of this handler.
pub const HANDLER_KIND: &str = "wol";

const MAC_LEN: usize = 6;
const REPETITIONS: usize = 16;

/// Total size of a magic packet.
pub const PACKET_LEN: usize = MAC_LEN * (REPETITIONS + 1);

/// Parsed `MAC:BROADCAST` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeTarget {
    pub mac: [u8; MAC_LEN],
    pub broadcast: Ipv4Addr,
}

impl WakeTarget {
    /// Parse `MAC12HEX:IPV4`.
    ///
    /// # Errors
    ///
    /// Returns a short reason when either half is malformed.
    pub fn parse(ssp: &str) -> Result<Self, &'static str> {
        let (mac, broadcast) = ssp.split_once(':').ok_or("expected MAC:BROADCAST")?;
        if mac.len() != MAC_LEN * 2 {
            return Err("MAC must be 12 hex digits");
        }
        let mut bytes = [0_u8; MAC_LEN];
        hex::decode_to_slice(mac, &mut bytes).map_err(|_| "MAC must be 12 hex digits")?;
        let broadcast = broadcast
            .parse()
            .map_err(|_| "broadcast must be an IPv4 address")?;
        Ok(Self {
            mac: bytes,
            broadcast,
        })
    }

    /// The magic packet waking this MAC.
    #[must_use]
    pub fn magic_packet(&self) -> [u8; PACKET_LEN] {
        let mut packet = [0xFF_u8; PACKET_LEN];
        for chunk in packet[MAC_LEN..].chunks_exact_mut(MAC_LEN) {
            chunk.copy_from_slice(&self.mac);
        }
        packet
    }
}

/// Sends magic packets over UDP broadcast.
#[derive(Debug, Clone)]
pub struct WolHandler {
    port: u16,
}

impl WolHandler {
    #[must_use]
    pub fn new(config: &WolConfig) -> Self {
        Self { port: config.port }
    }
}

#[async_trait]
impl TerminalHandler for WolHandler {
    async fn accept(&self, action: &Action) -> Result<(), ResolveError> {
        let ssp = action.scheme_specific_part();
        let target = WakeTarget::parse(ssp)
            .map_err(|reason| ResolveError::malformed(action.scheme(), ssp, reason))?;
        let address = SocketAddr::from((target.broadcast, self.port));

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(WolError::Socket)?;
        socket.set_broadcast(true).map_err(WolError::Socket)?;
        socket
            .send_to(&target.magic_packet(), address)
            .await
            .map_err(|source| WolError::Send { address, source })?;

        tracing::debug!(mac = %hex::encode(target.mac), %address, "magic packet sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_mac_and_broadcast() {
        let target = WakeTarget::parse("001122AaBbCc:192.168.1.255").unwrap();
        assert_eq!(target.mac, [0x00, 0x11, 0x22, 0xAA, 0xBB, 0xCC]);
        assert_eq!(target.broadcast, Ipv4Addr::new(192, 168, 1, 255));
    }

    #[test]
    fn should_reject_short_mac() {
        assert_eq!(
            WakeTarget::parse("001122:192.168.1.255"),
            Err("MAC must be 12 hex digits")
        );
    }

    #[test]
    fn should_reject_non_hex_mac() {
        assert!(WakeTarget::parse("00112233445g:192.168.1.255").is_err());
    }

    #[test]
    fn should_reject_invalid_broadcast() {
        assert_eq!(
            WakeTarget::parse("001122334455:lan"),
            Err("broadcast must be an IPv4 address")
        );
    }

    #[test]
    fn should_build_magic_packet() {
        let target = WakeTarget::parse("0a0b0c0d0e0f:255.255.255.255").unwrap();
        let packet = target.magic_packet();
        assert_eq!(packet.len(), 102);
        assert_eq!(packet[..6], [0xFF; 6]);
        assert!(
            packet[6..]
                .chunks(6)
                .all(|chunk| chunk == [0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f])
        );
    }

    #[tokio::test]
    async fn should_send_magic_packet_to_configured_port() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();
        let handler = WolHandler::new(&WolConfig {
            port,
            ..WolConfig::default()
        });

        let action = Action::parse("wol:001122334455:127.0.0.1").unwrap();
        handler.accept(&action).await.unwrap();

        let mut buffer = [0_u8; 256];
        let (read, _) = receiver.recv_from(&mut buffer).await.unwrap();
        assert_eq!(read, PACKET_LEN);
        assert_eq!(buffer[6..12], [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    }

    #[tokio::test]
    async fn should_fail_malformed_action() {
        let handler = WolHandler::new(&WolConfig::default());
        let action = Action::parse("wol:tv").unwrap();
        assert!(matches!(
            handler.accept(&action).await,
            Err(ResolveError::MalformedAction { scheme, .. }) if scheme == "wol"
        ));
    }
}
