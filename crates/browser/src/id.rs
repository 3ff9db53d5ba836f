use rand::RngCore;
use rand::rngs::OsRng;
use std::fmt::Write;

pub const DEFAULT_ID_LEN: usize = 8;

/// Random lowercase hex id of `len / 2` bytes drawn from the OS CSPRNG.
/// Odd lengths round down.
pub fn generate_id(len: usize) -> String {
    let mut bytes = vec![0u8; len / 2];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(len), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}
