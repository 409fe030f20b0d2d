//! Pack and unpack a UDP header with a named layout.
//!
//! Run with:
//!   cargo run --example udp-header --features layout

use binpack::codec::Value;
use binpack::layout::LayoutRegistry;

const UDP_HEADER: &str = r#"{
    "name": "udp-header",
    "description": "RFC 768 header",
    "fields": [
        { "name": "src_port", "token": ">H" },
        { "name": "dst_port", "token": "H" },
        { "name": "length", "token": "H" },
        { "name": "checksum", "token": "H" }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = LayoutRegistry::from_embedded(&[UDP_HEADER])?;

    let bytes = registry.pack_record(
        "udp-header",
        &[
            ("src_port", Value::U16(5353)),
            ("dst_port", Value::U16(53)),
            ("length", Value::U16(8)),
            ("checksum", Value::U16(0)),
        ],
    )?;
    eprintln!("packed {} bytes: {:02x?}", bytes.len(), &bytes[..]);

    let record = registry.unpack_record("udp-header", &bytes)?;
    for (name, value) in record.iter() {
        eprintln!("{name} = {value}");
    }
    Ok(())
}
