// Tratamento de erros ergonômico
use anyhow::Result;

// Módulos locais
mod checksum;
mod config;
mod icmp;
mod ping;
mod transport;

use config::PingConfig;
use transport::RawIcmpSocket;

/// Envia um único Echo Request para 127.0.0.1 e espera uma mensagem de volta.
/// Requer root (ou CAP_NET_RAW) para abrir o socket RAW.
fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    // Identificador: 16 bits baixos do PID, passado explicitamente
    let cfg = PingConfig::loopback(std::process::id());

    let request = icmp::build_echo_request(cfg.ident);
    println!(
        "Disparando Echo Request para {} (id=0x{:04X}, checksum=0x{:04X}, {} bytes, ttl={})",
        cfg.dst,
        cfg.ident,
        u16::from_be_bytes([request[2], request[3]]),
        request.len(),
        config::TTL
    );

    // Sem timeout: a leitura pode bloquear indefinidamente
    let exchange = ping::ping_once(RawIcmpSocket::open, &cfg)?;

    match &exchange.reply {
        Some(msg) => {
            // TTL só existe quando o kernel entregou o cabeçalho IP
            let ttl = msg.ttl.map_or_else(|| "?".to_string(), |t| t.to_string());
            println!(
                "{} bytes de {}: {} type={} code={} id=0x{:04X} icmp_seq={} ttl={} checksum=0x{:04X} ({}) tempo={:.2}ms",
                msg.len,
                cfg.dst,
                msg.kind(),
                msg.typ,
                msg.code,
                msg.ident,
                msg.seq,
                ttl,
                msg.checksum,
                if msg.checksum_ok { "ok" } else { "inválido" },
                exchange.rtt_ms()
            );
            if !(msg.is_echo_reply() && msg.matches(cfg.ident)) {
                // Em loopback o próprio request costuma chegar antes da resposta
                println!("A mensagem recebida não é o Echo Reply deste processo.");
            }
        }
        None => println!(
            "{} bytes recebidos de {} sem mensagem ICMP válida (tempo={:.2}ms)",
            exchange.received,
            cfg.dst,
            exchange.rtt_ms()
        ),
    }

    log::debug!("enviados={} recebidos={}", exchange.sent, exchange.received);

    Ok(())
}
