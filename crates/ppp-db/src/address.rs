use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// The `addressFrom` column held neither a binary IPv4/IPv4-mapped value nor
/// dotted-quad text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not an IPv4 address ({len} bytes)")]
pub struct AddressDecodeError {
    pub len: usize,
}

/// Decode a raw address column.
///
/// - 4 bytes: network-order IPv4.
/// - 16 bytes: IPv6; accepted only when it is IPv4-mapped.
/// - anything else: UTF-8 text, parsed as an IP and required to be IPv4
///   (or IPv4-mapped IPv6).
pub fn decode_address(raw: &[u8]) -> Result<Ipv4Addr, AddressDecodeError> {
    let err = AddressDecodeError { len: raw.len() };

    match raw.len() {
        4 => return Ok(Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3])),
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(raw);
            if let Some(v4) = Ipv6Addr::from(octets).to_ipv4_mapped() {
                return Ok(v4);
            }
        }
        _ => {}
    }

    let text = std::str::from_utf8(raw).map_err(|_| err.clone())?;
    match text.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => Ok(v4),
        Ok(IpAddr::V6(v6)) => v6.to_ipv4_mapped().ok_or(err),
        Err(_) => Err(err),
    }
}
