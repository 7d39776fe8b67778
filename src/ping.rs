use anyhow::{Context, Result};
use std::io;
use std::time::{Duration, Instant};

use crate::config::PingConfig;
use crate::icmp::{self, IcmpMessage};
use crate::transport::Transport;

/// Resultado de uma troca Echo Request / primeira mensagem recebida.
#[derive(Debug)]
pub struct Exchange {
    pub sent: usize,
    pub received: usize,
    /// `None` quando o que chegou não é uma mensagem ICMP completa.
    pub reply: Option<IcmpMessage>,
    pub rtt: Duration,
}

impl Exchange {
    pub fn rtt_ms(&self) -> f64 {
        self.rtt.as_secs_f64() * 1000.0
    }
}

/// Abre o transporte com `open`, envia um Echo Request e faz uma única
/// leitura bloqueante.
///
/// O transporte pertence a esta função e é descartado exatamente uma vez,
/// tanto no sucesso quanto em qualquer falha de envio ou recepção.
pub fn ping_once<T, F>(open: F, cfg: &PingConfig) -> Result<Exchange>
where
    T: Transport,
    F: FnOnce() -> io::Result<T>,
{
    let mut transport = open()
        .context("Falha ao criar socket RAW. Verifique se está rodando como root (CAP_NET_RAW).")?;

    let pkt = icmp::build_echo_request(cfg.ident);
    log::debug!(
        "checksum=0x{:04X} id=0x{:04X} pacote={:02X?}",
        u16::from_be_bytes([pkt[2], pkt[3]]),
        cfg.ident,
        pkt
    );

    // Marca o instante do envio para calcular o RTT
    let t0 = Instant::now();

    let sent = transport
        .send_to(&pkt, cfg.dst)
        .with_context(|| format!("Falha ao enviar Echo Request para {}", cfg.dst))?;

    let mut buf = vec![0u8; cfg.recv_buf_len];
    let received = transport
        .recv(&mut buf)
        .with_context(|| format!("Falha ao receber resposta de {}", cfg.dst))?;
    let rtt = t0.elapsed();

    log::trace!("recebido={:02X?}", &buf[..received]);

    let reply = icmp::parse_message(&buf[..received]);
    if reply.is_none() {
        log::warn!("{} bytes recebidos não formam uma mensagem ICMP", received);
    }

    Ok(Exchange {
        sent,
        received,
        reply,
        rtt,
    })
}
