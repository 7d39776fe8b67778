use std::net::Ipv4Addr;

/// Destino fixo: o ping só vai para a interface de loopback.
pub const DESTINATION: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Buffer da única leitura (cabeçalho IP + mensagem ICMP cabem com folga).
pub const RECV_BUF_LEN: usize = 256;

/// TTL dos pacotes enviados.
pub const TTL: u32 = 56;

/// Parâmetros da troca Echo Request / resposta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingConfig {
    pub dst: Ipv4Addr,
    pub ident: u16,
    pub recv_buf_len: usize,
}

impl PingConfig {
    /// Configuração padrão; o identificador vem dos 16 bits baixos do PID.
    pub fn loopback(pid: u32) -> Self {
        Self {
            dst: DESTINATION,
            ident: (pid & 0xFFFF) as u16,
            recv_buf_len: RECV_BUF_LEN,
        }
    }
}
