//! Integration tests for vrtc-expr.
//!
//! These tests drive the public API end to end: build a tree, encode it into
//! a datagram, decode it back.

use vrtc_expr::codec::{ExprCodec, JsonCodec, MsgPackCodec};
use vrtc_expr::expr::{
    make_bool, make_complex_float, make_complex_int, make_float, make_int, make_null, make_seq,
    make_seq1, make_seq2, make_seq3, make_seq4, make_str, make_string, seq_add_element,
};
use vrtc_expr::protocol::{
    decode, encode, encode_and_free, DatagramBuffer, Wire, ABSOLUTE_MAX_DATAGRAM_SIZE,
};
use vrtc_expr::{Expr, ExprError};

fn samples() -> Vec<Expr> {
    vec![
        make_null().unwrap(),
        make_bool(false).unwrap(),
        make_int(0).unwrap(),
        make_int(i64::MAX).unwrap(),
        make_int(i64::MIN).unwrap(),
        make_float(-2.75).unwrap(),
        make_complex_int(-1, 1).unwrap(),
        make_complex_float(1e-9, -1e9).unwrap(),
        make_string(&[0x00, 0x01, 0xfe, 0xff]).unwrap(),
        make_str("frequency").unwrap(),
        make_seq4(
            make_str("tune"),
            make_float(101.1e6),
            make_seq2(make_int(1), make_null()),
            make_seq(),
        )
        .unwrap(),
    ]
}

/// Build, encode, decode and inspect the canonical nested scenario.
#[test]
fn test_end_to_end_scenario() {
    let value = make_seq3(make_int(42), make_str("hi"), make_seq1(make_bool(true))).unwrap();

    let mut datagram = DatagramBuffer::new();
    encode_and_free(value, &mut datagram).unwrap();

    let decoded = decode(datagram.as_slice()).unwrap();
    assert_eq!(decoded.consumed, datagram.len());

    let e = decoded.expr;
    assert!(e.is_seq());
    assert_eq!(e.seq_len().unwrap(), 3);

    let first = e.seq_ref(0).unwrap();
    assert!(first.is_int());
    assert_eq!(first.get_int().unwrap(), 42);

    let second = e.seq_ref(1).unwrap();
    assert!(second.is_string());
    assert_eq!(second.string_bytes().unwrap(), b"hi");

    let third = e.seq_ref(2).unwrap();
    assert!(third.is_seq());
    assert_eq!(third.seq_len().unwrap(), 1);
    let inner = third.seq_ref(0).unwrap();
    assert!(inner.is_bool());
    assert!(inner.get_bool().unwrap());
}

/// Empty sequences and strings survive the wire.
#[test]
fn test_empty_containers() {
    let mut datagram = DatagramBuffer::new();
    encode_and_free(make_seq().unwrap(), &mut datagram).unwrap();
    let seq = decode(datagram.as_slice()).unwrap().expr;
    assert!(seq.is_seq());
    assert_eq!(seq.seq_len().unwrap(), 0);

    datagram.clear();
    encode_and_free(make_str("").unwrap(), &mut datagram).unwrap();
    let s = decode(datagram.as_slice()).unwrap().expr;
    assert!(s.is_string());
    assert_eq!(s.string_len().unwrap(), 0);
}

/// decode(encode(v)) == v for every sample, with both codecs.
#[test]
fn test_roundtrip_law() {
    for value in samples() {
        for codec in [&MsgPackCodec as &dyn ExprCodec, &JsonCodec] {
            let wire = Wire::new(codec);
            let mut datagram = DatagramBuffer::new();
            wire.encode(&value, &mut datagram).unwrap();
            let decoded = wire.decode(datagram.as_slice()).unwrap();
            assert_eq!(decoded.expr, value, "{}: {value}", codec.name());
        }
    }
}

/// Built incrementally or all at once, the same value gives the same bytes.
#[test]
fn test_encoding_is_deterministic() {
    let at_once = make_seq3(make_int(1), make_str("two"), make_float(3.0)).unwrap();

    let mut grown = make_seq().unwrap();
    grown = seq_add_element(grown, make_int(1).unwrap()).unwrap();
    grown = seq_add_element(grown, make_str("two").unwrap()).unwrap();
    grown = seq_add_element(grown, make_float(3.0).unwrap()).unwrap();

    let mut a = DatagramBuffer::new();
    let mut b = DatagramBuffer::new();
    encode(&at_once, &mut a).unwrap();
    encode(&grown, &mut b).unwrap();
    assert_eq!(a.as_slice(), b.as_slice());
}

/// Oversized values fail cleanly and leave the datagram as it was.
#[test]
fn test_capacity_enforcement() {
    let mut big = make_seq().unwrap();
    for i in 0..200 {
        big = seq_add_element(big, make_str(&format!("parameter-{i}")).unwrap()).unwrap();
    }

    let mut datagram = DatagramBuffer::new();
    encode(&make_int(7).unwrap(), &mut datagram).unwrap();
    let before = datagram.as_slice().to_vec();

    let err = encode(&big, &mut datagram).unwrap_err();
    match err {
        ExprError::EncodeTooLarge { size, remaining } => {
            assert!(size > remaining);
            assert_eq!(remaining, datagram.remaining());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(datagram.as_slice(), &before[..]);

    let mut roomy = DatagramBuffer::with_max_size(16 * 1024);
    encode(&big, &mut roomy).unwrap();
    assert_eq!(decode(roomy.as_slice()).unwrap().expr, big);
}

/// Every strict prefix of a valid encoding is rejected.
#[test]
fn test_decode_rejects_truncation() {
    let value = make_seq4(
        make_int(-300),
        make_str("truncate me"),
        make_complex_float(0.5, 0.25),
        make_seq2(make_null(), make_complex_int(9, -9)),
    )
    .unwrap();

    for codec in [&MsgPackCodec as &dyn ExprCodec, &JsonCodec] {
        let bytes = codec.encode_described(&value).unwrap();
        for cut in 1..bytes.len() {
            let result = Wire::new(codec).decode(&bytes[..cut]);
            assert!(
                matches!(result, Err(ExprError::DecodeMalformed(_))),
                "{} prefix of {cut}/{} bytes was accepted",
                codec.name(),
                bytes.len()
            );
        }
    }
}

fn nested(depth: usize, leaf: Expr) -> Expr {
    let mut value = leaf;
    for _ in 0..depth {
        value = make_seq1(Ok(value)).unwrap();
    }
    value
}

/// Nesting is bounded only by the datagram size, not by a depth limit.
#[test]
fn test_nested_sequences_up_to_datagram_ceiling() {
    for depth in [100, 2_000, 10_000] {
        let value = nested(depth, make_int(1).unwrap());

        let mut datagram = DatagramBuffer::with_max_size(ABSOLUTE_MAX_DATAGRAM_SIZE);
        encode(&value, &mut datagram).unwrap();

        let decoded = decode(datagram.as_slice()).unwrap();
        assert_eq!(decoded.consumed, datagram.len(), "depth {depth}");
        assert_eq!(decoded.expr, value, "depth {depth}");
    }
}

/// A datagram packed with sequence openers is refused as malformed, not
/// allowed to exhaust the stack.
#[test]
fn test_hostile_nesting_is_rejected() {
    let leaf = MsgPackCodec.encode_described(&Expr::Null).unwrap();
    let wrapped = MsgPackCodec
        .encode_described(&make_seq1(make_null()).unwrap())
        .unwrap();
    assert!(wrapped.ends_with(&leaf));
    let opener = &wrapped[..wrapped.len() - leaf.len()];

    let openers = ABSOLUTE_MAX_DATAGRAM_SIZE / opener.len();
    let mut hostile = DatagramBuffer::with_max_size(ABSOLUTE_MAX_DATAGRAM_SIZE);
    for _ in 0..openers {
        hostile.append(opener).unwrap();
    }
    assert!(matches!(
        decode(hostile.as_slice()),
        Err(ExprError::DecodeMalformed(_))
    ));

    // The same openers closed by a leaf are a valid, very deep value.
    let depth = (ABSOLUTE_MAX_DATAGRAM_SIZE - leaf.len()) / opener.len();
    let mut closed = Vec::with_capacity(ABSOLUTE_MAX_DATAGRAM_SIZE);
    for _ in 0..depth {
        closed.extend_from_slice(opener);
    }
    closed.extend_from_slice(&leaf);

    let decoded = decode(&closed).unwrap();
    assert_eq!(decoded.consumed, closed.len());
    assert_eq!(decoded.expr, nested(depth, make_null().unwrap()));
}

/// Several expressions can share one datagram; the codec walks them in order.
#[test]
fn test_multiple_expressions_per_datagram() {
    let mut datagram = DatagramBuffer::new();
    for i in 0..3 {
        encode_and_free(make_seq2(make_str("ch"), make_int(i)).unwrap(), &mut datagram).unwrap();
    }

    let mut rest = datagram.as_slice();
    let mut seen = Vec::new();
    while !rest.is_empty() {
        let (expr, consumed) = MsgPackCodec.decode_described(rest).unwrap();
        seen.push(expr.seq_ref(1).unwrap().get_int().unwrap());
        rest = &rest[consumed..];
    }
    assert_eq!(seen, vec![0, 1, 2]);
}

/// The decoded tree owns its data; reusing the datagram does not touch it.
#[test]
fn test_decoded_value_outlives_datagram() {
    let mut datagram = DatagramBuffer::new();
    encode_and_free(make_str("owned").unwrap(), &mut datagram).unwrap();
    let sent = datagram.freeze();

    let decoded = decode(&sent).unwrap();
    drop(sent);
    datagram.append(b"reused").unwrap();

    assert_eq!(decoded.expr.string_bytes().unwrap(), b"owned");
}
