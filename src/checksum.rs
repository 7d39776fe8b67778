/// Checksum da Internet (RFC 1071) sobre palavras de 16 bits big-endian.
///
/// Um byte final sem par é tratado como byte alto de uma palavra com byte
/// baixo zero.
pub fn checksum(data: &[u8]) -> u16 {
    let mut words = data.chunks_exact(2);
    let mut sum: u32 = words
        .by_ref()
        .map(|w| u16::from_be_bytes([w[0], w[1]]) as u32)
        .fold(0, u32::wrapping_add);

    if let Some(&last) = words.remainder().first() {
        sum = sum.wrapping_add(u16::from_be_bytes([last, 0]) as u32);
    }

    !(fold(sum))
}

/// Soma em complemento de um, já dobrada para 16 bits (sem complementar).
pub fn ones_complement_sum(data: &[u8]) -> u16 {
    !checksum(data)
}

// Dobra os carries acima de 16 bits de volta na parte baixa.
fn fold(mut sum: u32) -> u16 {
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}
