//! LZ77 decompression tests
//!
//! These tests feed hand-assembled streams through the decompressor and check
//! both the decoded bytes and the error reported for malformed streams.

use gbaview::lz77::{decompress, read_header};
use gbaview::{ByteSource, GbaViewError, LZ77_TAG};

/// Header for a stream of `size` decompressed bytes
fn header(size: u32) -> Vec<u8> {
    let mut data = vec![LZ77_TAG];
    data.extend_from_slice(&size.to_le_bytes()[..3]);
    data
}

/// Test a literal-only stream of up to eight bytes
#[test]
fn test_single_flag_literals() -> Result<(), Box<dyn std::error::Error>> {
    for n in 1..=8usize {
        let payload: Vec<u8> = (0..n as u8).map(|i| i.wrapping_mul(37) ^ 0x5A).collect();
        let mut data = header(n as u32);
        data.push(0x00);
        data.extend_from_slice(&payload);

        let decompressed = decompress(&ByteSource::from(data), 0)?;
        assert_eq!(decompressed, payload, "literal stream of {n} bytes");
    }
    Ok(())
}

/// Test the overlapping copy: one seed byte repeated by a distance-1 reference
#[test]
fn test_seed_byte_repeat() -> Result<(), Box<dyn std::error::Error>> {
    let data = hex::decode("1006000040ab2000")?;
    let decompressed = decompress(&ByteSource::from(data), 0)?;
    assert_eq!(decompressed, vec![0xAB; 6]);
    Ok(())
}

/// Test a stream with literals and references across several flag bytes
#[test]
fn test_mixed_tokens() -> Result<(), Box<dyn std::error::Error>> {
    // 16 literal bytes, then three distance-16 references (18 + 18 + 12)
    let pattern: Vec<u8> = (0x30..0x40).collect();
    let mut data = header(64);
    data.push(0x00);
    data.extend_from_slice(&pattern[..8]);
    data.push(0x00);
    data.extend_from_slice(&pattern[8..]);
    data.extend_from_slice(&[0xE0, 0xF0, 0x0F, 0xF0, 0x0F, 0x90, 0x0F]);

    let decompressed = decompress(&ByteSource::from(data), 0)?;
    assert_eq!(decompressed, pattern.repeat(4));
    Ok(())
}

/// Test that streams are located by mapped or raw address
#[test]
fn test_stream_inside_rom() -> Result<(), Box<dyn std::error::Error>> {
    let mut rom = vec![0xEEu8; 0x40];
    rom.extend(hex::decode("100300000011223344")?);
    rom.extend([0xEE; 8]);
    let rom = ByteSource::from(rom);

    assert_eq!(decompress(&rom, 0x40)?, vec![0x11, 0x22, 0x33]);
    assert_eq!(decompress(&rom, 0x0800_0040)?, vec![0x11, 0x22, 0x33]);
    assert_eq!(read_header(&rom, 0x40)?.size, 3);
    Ok(())
}

/// Test that only the tag byte decides InvalidHeader
#[test]
fn test_invalid_header_iff_tag_differs() {
    for tag in 0..=255u8 {
        let mut data = vec![tag, 0x01, 0x00, 0x00, 0x00, 0x7F];
        data.resize(16, 0);
        let result = decompress(&ByteSource::from(data), 0);
        let invalid = matches!(result, Err(GbaViewError::InvalidHeader { .. }));
        assert_eq!(invalid, tag != LZ77_TAG, "tag 0x{tag:02X}");
    }
}

/// Test back-references reaching beyond the declared size
#[test]
fn test_distance_exceeds_size() {
    for size in [1u32, 8, 32, 4095] {
        let mut data = header(size);
        // Reference as first token with the maximum distance of 4096
        data.extend_from_slice(&[0x80, 0x0F, 0xFF]);
        let result = decompress(&ByteSource::from(data), 0);
        assert!(
            matches!(
                result,
                Err(GbaViewError::InvalidBackReference { distance: 4096, .. })
            ),
            "size {size}: {result:?}"
        );
    }
}

/// Test back-references reaching before the first output byte
#[test]
fn test_reference_underflow() {
    let mut data = header(64);
    data.extend_from_slice(&[0x10, 1, 2, 3, 0x00, 0x04]);
    let result = decompress(&ByteSource::from(data), 0);
    assert!(matches!(
        result,
        Err(GbaViewError::InvalidBackReference {
            distance: 5,
            position: 3
        })
    ));
}

/// Test that a stream cut short is reported rather than padded
#[test]
fn test_truncated_stream() {
    let mut data = header(32);
    data.push(0x00);
    data.extend_from_slice(&[0x55; 5]);
    let result = decompress(&ByteSource::from(data), 0);
    assert!(matches!(result, Err(GbaViewError::UnexpectedEof { offset: 10 })));
}

/// Test offsets past the end of the buffer
#[test]
fn test_offset_out_of_range() {
    let rom = ByteSource::from(vec![0u8; 16]);
    assert!(matches!(
        decompress(&rom, 0x1000),
        Err(GbaViewError::UnexpectedEof { .. })
    ));
    assert!(matches!(
        decompress(&rom, 14),
        Err(GbaViewError::UnexpectedEof { .. })
    ));
}
