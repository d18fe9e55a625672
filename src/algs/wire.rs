//! Fixed little-endian wire layout for index arrays.
//!
//! A transport moves `gather_idxs` and friends as contiguous bytes. Every
//! index is stored little-endian regardless of the host; decoding checks the
//! buffer length before touching it.

use std::mem::size_of;

use crate::dist_error::DistError;
use crate::index::IndexLike;

/// Encode indices as little-endian bytes.
pub fn encode_indices<I: IndexLike>(indices: &[I]) -> Vec<u8> {
    let le: Vec<I> = indices.iter().map(|i| i.to_le()).collect();
    bytemuck::cast_slice(&le).to_vec()
}

/// Decode a buffer produced by [`encode_indices`].
///
/// # Errors
/// [`DistError::Wire`] if the length is not a multiple of the index width.
pub fn decode_indices<I: IndexLike>(bytes: &[u8]) -> Result<Vec<I>, DistError> {
    let width = size_of::<I>();
    if bytes.len() % width != 0 {
        return Err(DistError::Wire(format!(
            "{} bytes is not a whole number of {width}-byte indices",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(width)
        .map(|chunk| I::from_le(bytemuck::pod_read_unaligned(chunk)))
        .collect())
}

/// Decode into a caller-sized buffer, e.g. one sized from `recv_sizes`.
pub fn decode_indices_into<I: IndexLike>(bytes: &[u8], out: &mut [I]) -> Result<(), DistError> {
    let expected = out.len() * size_of::<I>();
    if bytes.len() != expected {
        return Err(DistError::Wire(format!(
            "expected {expected} bytes, got {}",
            bytes.len()
        )));
    }
    bytemuck::cast_slice_mut(out).copy_from_slice(bytes);
    for v in out.iter_mut() {
        *v = I::from_le(*v);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_little_endian_on_the_wire() {
        let bytes = encode_indices(&[1i32, 0x0102_0304]);
        assert_eq!(bytes, vec![1, 0, 0, 0, 4, 3, 2, 1]);
        assert_eq!(decode_indices::<i32>(&bytes).unwrap(), vec![1, 0x0102_0304]);
    }

    #[test]
    fn ragged_buffers_are_rejected() {
        assert!(matches!(
            decode_indices::<i64>(&[0u8; 12]),
            Err(DistError::Wire(_))
        ));
        let mut out = [0i32; 2];
        assert!(decode_indices_into(&[0u8; 4], &mut out).is_err());
        decode_indices_into(&encode_indices(&[7i32, -3]), &mut out).unwrap();
        assert_eq!(out, [7, -3]);
    }
}
