/// Longest remaining length field allowed by MQTT
const MAX_LENGTH_BYTES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Remaining length field is longer than four bytes
    MalformedLength,
}

/// Size of the first packet in `buf`, or `None` while it is incomplete.
pub fn packet_len(buf: &[u8]) -> Result<Option<usize>, FrameError> {
    let mut remaining = 0usize;
    for (index, byte) in buf.iter().enumerate().skip(1) {
        if index > MAX_LENGTH_BYTES {
            return Err(FrameError::MalformedLength);
        }
        remaining |= usize::from(byte & 0x7F) << (7 * (index - 1));
        if byte & 0x80 == 0 {
            let total = index + 1 + remaining;
            return Ok((buf.len() >= total).then_some(total));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_len_single_byte_length() {
        assert_eq!(packet_len(&[0xD0, 0x00]), Ok(Some(2)));
        assert_eq!(packet_len(&[0x40, 0x02, 0x12]), Ok(None));
        assert_eq!(packet_len(&[0x40, 0x02, 0x12, 0x34, 0x30]), Ok(Some(4)));
    }

    #[test]
    fn test_packet_len_waits_for_header() {
        assert_eq!(packet_len(&[]), Ok(None));
        assert_eq!(packet_len(&[0x30]), Ok(None));
        assert_eq!(packet_len(&[0x30, 0x80]), Ok(None));
    }

    #[test]
    fn test_packet_len_multi_byte_length() {
        let mut packet = [0u8; 131];
        packet[0] = 0x30;
        packet[1] = 0x80;
        packet[2] = 0x01;
        assert_eq!(packet_len(&packet[..130]), Ok(None));
        assert_eq!(packet_len(&packet), Ok(Some(131)));
    }

    #[test]
    fn test_packet_len_rejects_long_length_field() {
        assert_eq!(
            packet_len(&[0x30, 0x80, 0x80, 0x80, 0x80, 0x01]),
            Err(FrameError::MalformedLength)
        );
    }
}
