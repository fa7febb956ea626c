//! Shared test fixtures: a minimal little-endian TIFF carrying a GPS IFD,
//! and a hand-rolled multipart body
#![allow(dead_code)]

pub type Dms = [(u32, u32); 3];

fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// IFD entry whose value fits inline (4 bytes)
fn push_entry(buf: &mut Vec<u8>, tag: u16, typ: u16, count: u32, value: [u8; 4]) {
    push_u16(buf, tag);
    push_u16(buf, typ);
    push_u32(buf, count);
    buf.extend_from_slice(&value);
}

/// TIFF with IFD0 -> GPS IFD holding lat/lon refs and DMS rationals
///
/// Layout: header (8) | IFD0, 1 entry (18) | GPS IFD, 4 entries (54) |
/// latitude rationals (24) | longitude rationals (24)
pub fn tiff_with_gps(lat: Dms, lat_ref: u8, lon: Dms, lon_ref: u8) -> Vec<u8> {
    const GPS_IFD_OFFSET: u32 = 26;
    const LAT_OFFSET: u32 = 80;
    const LON_OFFSET: u32 = 104;

    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    push_u16(&mut buf, 42);
    push_u32(&mut buf, 8);

    // IFD0: GPSInfo pointer
    push_u16(&mut buf, 1);
    push_entry(&mut buf, 0x8825, 4, 1, GPS_IFD_OFFSET.to_le_bytes());
    push_u32(&mut buf, 0);
    assert_eq!(buf.len() as u32, GPS_IFD_OFFSET);

    // GPS IFD
    push_u16(&mut buf, 4);
    push_entry(&mut buf, 1, 2, 2, [lat_ref, 0, 0, 0]);
    push_entry(&mut buf, 2, 5, 3, LAT_OFFSET.to_le_bytes());
    push_entry(&mut buf, 3, 2, 2, [lon_ref, 0, 0, 0]);
    push_entry(&mut buf, 4, 5, 3, LON_OFFSET.to_le_bytes());
    push_u32(&mut buf, 0);
    assert_eq!(buf.len() as u32, LAT_OFFSET);

    for (num, den) in lat.iter().chain(lon.iter()) {
        push_u32(&mut buf, *num);
        push_u32(&mut buf, *den);
    }
    assert_eq!(buf.len() as u32, LON_OFFSET + 24);
    buf
}

/// TIFF whose only tag is `Make`
pub fn tiff_without_gps() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    push_u16(&mut buf, 42);
    push_u32(&mut buf, 8);

    push_u16(&mut buf, 1);
    push_entry(&mut buf, 0x010F, 2, 4, *b"Cam\0");
    push_u32(&mut buf, 0);
    buf
}

/// Pittsburgh: 40°26'46" N, 79°58'56" W
pub fn pittsburgh_tiff() -> Vec<u8> {
    tiff_with_gps(
        [(40, 1), (26, 1), (46, 1)],
        b'N',
        [(79, 1), (58, 1), (56, 1)],
        b'W',
    )
}

pub const BOUNDARY: &str = "geophoto-test-boundary";

/// One-part multipart body
pub fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                field, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
