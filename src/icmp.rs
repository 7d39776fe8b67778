use crate::checksum::{checksum, ones_complement_sum};

pub const ECHO_REQUEST: u8 = 8;
pub const ECHO_REPLY: u8 = 0;

/// Tamanho fixo do Echo Request: cabeçalho de 8 bytes + 2 bytes de payload.
pub const HEADER_LEN: usize = 10;

/// Preenchimento do payload (lugar reservado para um timestamp).
pub const PAYLOAD_FILLER: u16 = 0xC0DE;

// Menor mensagem ICMP que ainda carrega identifier e sequence.
const MIN_MESSAGE_LEN: usize = 8;
const MIN_IPV4_HEADER_LEN: usize = 20;
const IPV4_TTL_OFFSET: usize = 8;

/// Monta um Echo Request (type=8, code=0, seq=0) de 10 bytes.
pub fn build_echo_request(ident: u16) -> [u8; HEADER_LEN] {
    let mut pkt = [0u8; HEADER_LEN];

    // Type, Code; checksum fica zerado até o cálculo
    pkt[0] = ECHO_REQUEST;
    pkt[1] = 0;

    // Identifier e Sequence (big-endian)
    pkt[4..6].copy_from_slice(&ident.to_be_bytes());
    pkt[6..8].copy_from_slice(&0u16.to_be_bytes());

    pkt[8..10].copy_from_slice(&PAYLOAD_FILLER.to_be_bytes());

    let csum = checksum(&pkt);
    pkt[2..4].copy_from_slice(&csum.to_be_bytes());

    pkt
}

/// Mensagem ICMP recebida, já sem o cabeçalho IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpMessage {
    pub typ: u8,
    pub code: u8,
    pub checksum: u16,
    pub ident: u16,
    pub seq: u16,
    /// Bytes ICMP (cabeçalho + payload).
    pub len: usize,
    pub checksum_ok: bool,
    /// TTL do cabeçalho IPv4, quando ele veio no buffer.
    pub ttl: Option<u8>,
}

impl IcmpMessage {
    pub fn is_echo_reply(&self) -> bool {
        self.typ == ECHO_REPLY && self.code == 0
    }

    pub fn matches(&self, ident: u16) -> bool {
        self.ident == ident && self.seq == 0
    }

    pub fn kind(&self) -> &'static str {
        match self.typ {
            ECHO_REPLY => "echo-reply",
            ECHO_REQUEST => "echo-request",
            3 => "destination-unreachable",
            11 => "time-exceeded",
            _ => "desconhecido",
        }
    }
}

/// Decodifica o que chegou no socket RAW.
///
/// Em sockets RAW IPv4 o kernel entrega o cabeçalho IP junto; se o buffer
/// começar com versão 4 o IHL é pulado. Retorna `None` quando o IHL é
/// menor que 5 ou quando não sobra uma mensagem ICMP completa.
pub fn parse_message(buf: &[u8]) -> Option<IcmpMessage> {
    let (start, ttl) = if buf.len() >= MIN_IPV4_HEADER_LEN && (buf[0] >> 4) == 4 {
        let ihl = (buf[0] & 0x0F) as usize * 4;
        if ihl < MIN_IPV4_HEADER_LEN {
            return None;
        }
        (ihl, Some(buf[IPV4_TTL_OFFSET]))
    } else {
        (0, None)
    };

    let icmp = buf.get(start..)?;
    if icmp.len() < MIN_MESSAGE_LEN {
        return None;
    }

    Some(IcmpMessage {
        typ: icmp[0],
        code: icmp[1],
        checksum: u16::from_be_bytes([icmp[2], icmp[3]]),
        ident: u16::from_be_bytes([icmp[4], icmp[5]]),
        seq: u16::from_be_bytes([icmp[6], icmp[7]]),
        len: icmp.len(),
        checksum_ok: ones_complement_sum(icmp) == 0xFFFF,
        ttl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cabeçalho IPv4 mínimo (IHL=5), protocolo ICMP, 127.0.0.1 -> 127.0.0.1
    fn ipv4_prefix() -> Vec<u8> {
        vec![
            0x45, 0, 0, 30, 0, 0, 0x40, 0, 64, 1, 0, 0, 127, 0, 0, 1, 127, 0, 0, 1,
        ]
    }

    fn echo_reply(ident: u16) -> Vec<u8> {
        let mut pkt = build_echo_request(ident);
        pkt[0] = ECHO_REPLY;
        pkt[2..4].copy_from_slice(&[0, 0]);
        let csum = checksum(&pkt);
        pkt[2..4].copy_from_slice(&csum.to_be_bytes());
        pkt.to_vec()
    }

    #[test]
    fn request_has_fixed_layout() {
        let pkt = build_echo_request(0x1A2B);

        assert_eq!(pkt[0], ECHO_REQUEST);
        assert_eq!(pkt[1], 0);
        assert_eq!(&pkt[2..4], &[0x1C, 0xF6]);
        assert_eq!(&pkt[4..6], &[0x1A, 0x2B]);
        assert_eq!(&pkt[6..8], &[0, 0]);
        assert_eq!(&pkt[8..10], &[0xC0, 0xDE]);
    }

    #[test]
    fn request_checksum_verifies() {
        for ident in [0, 1, 0x1A2B, 0xFFFF] {
            assert_eq!(checksum(&build_echo_request(ident)), 0);
        }
    }

    #[test]
    fn parses_bare_icmp() {
        let msg = parse_message(&build_echo_request(7)).unwrap();

        assert_eq!(msg.typ, ECHO_REQUEST);
        assert_eq!(msg.kind(), "echo-request");
        assert_eq!(msg.ident, 7);
        assert_eq!(msg.len, HEADER_LEN);
        assert!(msg.checksum_ok);
        assert!(!msg.is_echo_reply());
        assert_eq!(msg.ttl, None);
    }

    #[test]
    fn skips_ipv4_header() {
        let mut buf = ipv4_prefix();
        buf.extend(echo_reply(0x1A2B));

        let msg = parse_message(&buf).unwrap();
        assert!(msg.is_echo_reply());
        assert!(msg.matches(0x1A2B));
        assert!(!msg.matches(0x1A2C));
        assert_eq!(msg.len, HEADER_LEN);
        assert!(msg.checksum_ok);
        assert_eq!(msg.ttl, Some(64));
    }

    #[test]
    fn skips_ipv4_options() {
        // IHL=6: 4 bytes de opções depois do cabeçalho fixo
        let mut buf = ipv4_prefix();
        buf[0] = 0x46;
        buf.extend_from_slice(&[1, 1, 1, 0]);
        buf.extend(echo_reply(0x1A2B));

        let msg = parse_message(&buf).unwrap();
        assert!(msg.is_echo_reply());
        assert!(msg.matches(0x1A2B));
        assert_eq!(msg.len, HEADER_LEN);
        assert_eq!(msg.ttl, Some(64));
    }

    #[test]
    fn ihl_below_minimum_is_rejected() {
        let mut buf = ipv4_prefix();
        buf[0] = 0x41;
        buf.extend_from_slice(&build_echo_request(7));

        assert_eq!(parse_message(&buf), None);
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert_eq!(parse_message(&[]), None);
        assert_eq!(parse_message(&[0, 0, 0, 0]), None);

        // IP inteiro mas sem ICMP depois
        assert_eq!(parse_message(&ipv4_prefix()), None);
    }

    #[test]
    fn corrupted_message_is_flagged() {
        let mut pkt = echo_reply(42);
        pkt[9] ^= 0xFF;

        let msg = parse_message(&pkt).unwrap();
        assert!(!msg.checksum_ok);
    }
}
