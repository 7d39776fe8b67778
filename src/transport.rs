use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::{self, Read};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::config::TTL;

/// Envio e recepção de datagramas ICMP crus.
pub trait Transport {
    /// Envia `packet` para `dst`; retorna quantos bytes saíram.
    fn send_to(&mut self, packet: &[u8], dst: Ipv4Addr) -> io::Result<usize>;

    /// Leitura bloqueante (sem timeout) de um datagrama.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Socket RAW ICMPv4. Fechado no `Drop`.
pub struct RawIcmpSocket {
    sock: Socket,
}

impl RawIcmpSocket {
    /// Abre AF_INET / SOCK_RAW / IPPROTO_ICMP com TTL [`TTL`].
    ///
    /// Alvo Unix (Linux): o tipo vem de `libc::SOCK_RAW` e a abertura
    /// requer root ou CAP_NET_RAW.
    pub fn open() -> io::Result<Self> {
        let sock = Socket::new(
            Domain::IPV4,
            Type::from(libc::SOCK_RAW),
            Some(Protocol::ICMPV4),
        )?;
        sock.set_ttl_v4(TTL)?;
        log::debug!("socket RAW ICMP aberto (ttl={})", TTL);
        Ok(Self { sock })
    }
}

impl Transport for RawIcmpSocket {
    fn send_to(&mut self, packet: &[u8], dst: Ipv4Addr) -> io::Result<usize> {
        // Porta é ignorada para ICMP
        let addr = SockAddr::from(SocketAddr::new(IpAddr::V4(dst), 0));
        self.sock.send_to(packet, &addr)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.sock.read(buf)
    }
}

impl Drop for RawIcmpSocket {
    fn drop(&mut self) {
        // o descritor é fechado pelo Drop do próprio Socket
        log::debug!("socket RAW ICMP fechado");
    }
}
