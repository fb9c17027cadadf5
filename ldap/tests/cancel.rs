use hex_literal::hex;
use ldap::asn1::{DecoderConfig, DecoderState};
use ldap::{Cancel, CancelContainer, CancelDecoder, CancelFactory, ExtendedRequestFactory, LdapError};

#[test]
fn decode_then_encode_is_identity() {
    let data = hex!("30 03 02 01 01");
    let decoder = CancelDecoder::new();
    let mut container = CancelContainer::new();
    decoder.decode(&data, &mut container).unwrap();
    assert_eq!(container.state(), DecoderState::Done);

    let cancel = container.into_cancel().unwrap();
    assert_eq!(cancel.cancel_id(), 1);
    assert_eq!(cancel.compute_length(), data.len());
    assert_eq!(&cancel.encode().unwrap()[..], &data[..]);
}

#[test]
fn encode_then_decode_keeps_the_id() {
    for id in [0, 1, 255, 256, 1 << 20, i32::MAX] {
        let encoded = Cancel::new(id).encode().unwrap();
        assert_eq!(Cancel::decode(&encoded).unwrap().cancel_id(), id);
    }
}

#[test]
fn malformed_values_are_rejected() {
    let cases: [(&[u8], &str); 5] = [
        (&hex!("31 03 02 01 01"), "expected SEQUENCE"),
        (&hex!("30 00"), "cancelId required"),
        (&hex!("30 02 02 00"), "empty cancelId"),
        (&hex!("30 06 02 04 FF FF FF FF"), "bad cancelId"),
        (&hex!("30 06 02 01 01 02 01 02"), "unexpected extra field"),
    ];
    for (data, message) in cases {
        match Cancel::decode(data) {
            Err(LdapError::Decoding(m)) => assert_eq!(m, message),
            other => panic!("{:02X?}: unexpected result {:?}", data, other),
        }
    }
}

#[test]
fn factory_and_configured_decoder() {
    let factory = CancelFactory::new();
    assert_eq!(factory.oid(), Cancel::EXTENSION_OID);
    assert_eq!(factory.decode_request(&hex!("30 03 02 01 07")).unwrap(), Cancel::new(7));

    let config: DecoderConfig = serde_json::from_str(r#"{"max_pdu_length": 4}"#).unwrap();
    let decoder = CancelDecoder::with_config(config);
    assert!(decoder.decode_cancel(&hex!("30 03 02 01 07")).is_ok());
    assert!(decoder.decode_cancel(&hex!("30 06 02 04 00 00 00 07")).is_err());
}
