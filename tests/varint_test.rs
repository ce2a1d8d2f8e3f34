//! Varint wire-mode integration tests through the stream types.

use oxistream::{
    OxiStreamError, StreamConfig, StreamReader, StreamWriter, VarintMode, VarintWidth,
};
use std::io::Cursor;

fn reader_with(config: StreamConfig, data: Vec<u8>) -> StreamReader<Cursor<Vec<u8>>> {
    StreamReader::with_config(Cursor::new(data), config).expect("reader creation failed")
}

fn writer_with(config: StreamConfig) -> StreamWriter<Cursor<Vec<u8>>> {
    StreamWriter::with_config(Cursor::new(Vec::new()), config).expect("writer creation failed")
}

const ZIGZAG: StreamConfig = StreamConfig::LITTLE_ENDIAN;
const SEVEN_BIT: StreamConfig = StreamConfig::SEVEN_BIT;

#[test]
fn test_unsigned_layout_is_mode_independent() {
    // Both modes share the unsigned wire layout; only the signed mapping
    // differs.
    for config in [ZIGZAG, SEVEN_BIT] {
        let mut w = writer_with(config);
        assert_eq!(w.write_unsigned_varint(300).expect("write failed"), 2);
        let buf = w.into_inner().into_inner();
        assert_eq!(buf, vec![0xAC, 0x02]);

        let mut r = reader_with(config, buf);
        assert_eq!(r.read_unsigned_varint().expect("read failed"), 300);
    }
}

#[test]
fn test_modes_disagree_on_signed_bytes() {
    // The same byte decodes to different values under the two modes. The
    // modes are wire-incompatible; mixing them corrupts data silently.
    let mut r = reader_with(ZIGZAG, vec![0x01]);
    assert_eq!(r.read_varint().expect("read failed"), -1);

    let mut r = reader_with(SEVEN_BIT, vec![0x01]);
    assert_eq!(r.read_varint().expect("read failed"), 1);

    let mut r = reader_with(ZIGZAG, vec![0x02]);
    assert_eq!(r.read_varint().expect("read failed"), 1);

    let mut r = reader_with(SEVEN_BIT, vec![0x02]);
    assert_eq!(r.read_varint().expect("read failed"), 2);
}

#[test]
fn test_zigzag_known_wire_vectors() {
    let cases: [(i64, &[u8]); 5] = [
        (0, &[0x00]),
        (-1, &[0x01]),
        (1, &[0x02]),
        (-64, &[0x7F]),
        (-300, &[0xD7, 0x04]),
    ];
    for (value, expected) in cases {
        let mut w = writer_with(ZIGZAG);
        w.write_varint(value).expect("write failed");
        let buf = w.into_inner().into_inner();
        assert_eq!(buf, expected, "encoding of {value}");

        let mut r = reader_with(ZIGZAG, buf);
        assert_eq!(r.read_varint().expect("read failed"), value);
    }
}

#[test]
fn test_seven_bit_negative_occupies_full_width() {
    let mut w = writer_with(SEVEN_BIT);
    assert_eq!(w.write_varint(-1).expect("write failed"), 5);
    let buf = w.into_inner().into_inner();
    assert_eq!(buf, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);

    let mut r = reader_with(SEVEN_BIT, buf);
    assert_eq!(r.read_varint().expect("read failed"), -1);

    // Under the 64-bit width the same value takes ten bytes.
    let config = SEVEN_BIT.with_varint_width(VarintWidth::Bits64);
    let mut w = writer_with(config);
    assert_eq!(w.write_varint(-1).expect("write failed"), 10);
    let buf = w.into_inner().into_inner();

    let mut r = reader_with(config, buf);
    assert_eq!(r.read_varint().expect("read failed"), -1);
}

#[test]
fn test_unsigned_never_sign_extends() {
    // The all-ones 32-bit pattern is a large positive number through the
    // unsigned entry point and -1 through the signed seven-bit one.
    let data = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F];

    let mut r = reader_with(SEVEN_BIT, data.clone());
    assert_eq!(r.read_unsigned_varint().expect("read failed"), 0xFFFF_FFFF);

    let mut r = reader_with(SEVEN_BIT, data);
    assert_eq!(r.read_varint().expect("read failed"), -1);
}

#[test]
fn test_width_cap_32_rejects_oversized() {
    // Fifth byte with payload above the four allowed bits.
    let config = ZIGZAG.with_varint_width(VarintWidth::Bits32);
    let mut r = reader_with(config, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x10]);
    assert!(matches!(
        r.read_unsigned_varint(),
        Err(OxiStreamError::VarintOverflow { max_bits: 32 })
    ));

    // Continuation into a sixth byte.
    let mut r = reader_with(config, vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
    assert!(matches!(
        r.read_unsigned_varint(),
        Err(OxiStreamError::VarintOverflow { max_bits: 32 })
    ));
}

#[test]
fn test_width_cap_64_rejects_oversized() {
    // Tenth byte above 0x01.
    let data = vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02];
    let mut r = reader_with(ZIGZAG, data);
    assert!(matches!(
        r.read_unsigned_varint(),
        Err(OxiStreamError::VarintOverflow { max_bits: 64 })
    ));
}

#[test]
fn test_varint_stops_at_terminator() {
    // A varint followed by a sentinel: decoding consumes exactly the
    // encoded bytes.
    let mut r = reader_with(ZIGZAG, vec![0xAC, 0x02, 0x5A]);
    assert_eq!(r.read_unsigned_varint().expect("read failed"), 300);
    assert_eq!(r.position(), 2);
    assert_eq!(r.read_u8().expect("read failed"), 0x5A);
}

#[test]
fn test_dedicated_7bit_calls_ignore_mode() {
    // The configuration selects zigzag, but the dedicated entry points
    // always speak two's complement.
    let mut w = writer_with(ZIGZAG);
    assert_eq!(w.write_7bit_i32(300).expect("write failed"), 2);
    assert_eq!(w.write_7bit_i64(-1).expect("write failed"), 10);
    let buf = w.into_inner().into_inner();
    assert_eq!(&buf[..2], &[0xAC, 0x02]);
    assert_eq!(buf.len(), 12);

    let mut r = reader_with(ZIGZAG, buf);
    assert_eq!(r.read_7bit_i32().expect("read failed"), 300);
    assert_eq!(r.read_7bit_i64().expect("read failed"), -1);
}

#[test]
fn test_extremes_roundtrip_in_every_mode() {
    let mode_widths = [
        (VarintMode::Zigzag, VarintWidth::Bits32),
        (VarintMode::Zigzag, VarintWidth::Bits64),
        (VarintMode::SevenBit, VarintWidth::Bits32),
        (VarintMode::SevenBit, VarintWidth::Bits64),
    ];
    for (mode, width) in mode_widths {
        let config = StreamConfig::default()
            .with_varint_mode(mode)
            .with_varint_width(width);
        let values: &[i64] = match width {
            VarintWidth::Bits32 => &[0, 1, -1, 300, -300, i32::MAX as i64, i32::MIN as i64],
            VarintWidth::Bits64 => &[0, 1, -1, 1 << 45, -(1 << 45), i64::MAX, i64::MIN],
        };

        let mut w = writer_with(config);
        for &v in values {
            w.write_varint(v).expect("write failed");
        }
        let buf = w.into_inner().into_inner();

        let mut r = reader_with(config, buf);
        for &v in values {
            assert_eq!(
                r.read_varint().expect("read failed"),
                v,
                "{mode:?} {width:?} {v}"
            );
        }
    }
}

#[test]
fn test_truncated_varint_reports_eof() {
    // A continuation bit with nothing after it.
    let mut r = reader_with(ZIGZAG, vec![0x80]);
    assert!(matches!(
        r.read_unsigned_varint(),
        Err(OxiStreamError::Io(_))
    ));
}

#[test]
fn test_positioned_varint_reads() {
    let mut data = vec![0u8; 8];
    data[4] = 0xAC;
    data[5] = 0x02;
    let mut r = reader_with(ZIGZAG, data);
    r.set_position(1).expect("seek failed");
    assert_eq!(r.read_unsigned_varint_at(4).expect("read failed"), 300);
    assert_eq!(r.position(), 1);
}
