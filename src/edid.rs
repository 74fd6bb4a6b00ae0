//! Minimal EDID base-block decoding.
//!
//! Only the identification fields are read: manufacturer PNP id, product
//! code, serial number and the monitor-name / serial-string descriptors.

const HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
const BASE_BLOCK_LEN: usize = 128;
const DESCRIPTOR_OFFSETS: [usize; 4] = [54, 72, 90, 108];
const DESCRIPTOR_LEN: usize = 18;

const TAG_SERIAL: u8 = 0xFF;
const TAG_NAME: u8 = 0xFC;

/// Identification fields decoded from an EDID blob.
///
/// Fields that are absent or malformed are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdidIdentity {
    pub manufacturer: String,
    pub product_code: u16,
    pub model: String,
    pub serial: String,
}

/// Decode the identification fields of an EDID base block.
///
/// Returns `None` when the blob is too short or the header is wrong.
pub fn parse(bytes: &[u8]) -> Option<EdidIdentity> {
    if bytes.len() < BASE_BLOCK_LEN || bytes[..8] != HEADER {
        return None;
    }

    let manufacturer = manufacturer_from_code(u16::from_be_bytes([bytes[8], bytes[9]]));
    let product_code = u16::from_le_bytes([bytes[10], bytes[11]]);
    let serial_number = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut model = String::new();
    let mut serial = String::new();
    for offset in DESCRIPTOR_OFFSETS {
        let descriptor = &bytes[offset..offset + DESCRIPTOR_LEN];
        // Display descriptors start with a zero pixel clock.
        if descriptor[0] != 0 || descriptor[1] != 0 || descriptor[2] != 0 {
            continue;
        }
        match descriptor[3] {
            TAG_NAME => model = descriptor_text(&descriptor[5..]),
            TAG_SERIAL => serial = descriptor_text(&descriptor[5..]),
            _ => {}
        }
    }

    if model.is_empty() && product_code != 0 {
        model = format!("{product_code:04X}");
    }
    if serial.is_empty() && serial_number != 0 {
        serial = serial_number.to_string();
    }

    Some(EdidIdentity {
        manufacturer,
        product_code,
        model,
        serial,
    })
}

/// Decode a packed three-letter PNP manufacturer id.
///
/// Each letter is five bits, `1` = `A`. Out-of-range letters yield an empty
/// string.
pub fn manufacturer_from_code(code: u16) -> String {
    let letters = [(code >> 10) & 0x1F, (code >> 5) & 0x1F, code & 0x1F];
    if letters.iter().any(|&l| !(1..=26).contains(&l)) {
        return String::new();
    }
    letters
        .iter()
        .map(|&l| char::from(b'A' + (l as u8) - 1))
        .collect()
}

fn descriptor_text(payload: &[u8]) -> String {
    let text: String = payload
        .iter()
        .take_while(|&&b| b != 0x0A && b != 0)
        .map(|&b| char::from(b))
        .collect();
    text.trim_end().to_string()
}

#[cfg(test)]
pub(crate) fn sample(name: &str, serial: &str) -> Vec<u8> {
    let mut edid = vec![0u8; BASE_BLOCK_LEN];
    edid[..8].copy_from_slice(&HEADER);
    // "DEL"
    edid[8] = 0x10;
    edid[9] = 0xAC;
    edid[10] = 0xA4;
    edid[11] = 0x41;
    edid[12..16].copy_from_slice(&12345u32.to_le_bytes());

    let mut write_descriptor = |offset: usize, tag: u8, text: &str| {
        edid[offset + 3] = tag;
        let payload = &mut edid[offset + 5..offset + DESCRIPTOR_LEN];
        payload.fill(0x20);
        let bytes = text.as_bytes();
        payload[..bytes.len()].copy_from_slice(bytes);
        if bytes.len() < payload.len() {
            payload[bytes.len()] = 0x0A;
        }
    };
    if !name.is_empty() {
        write_descriptor(72, TAG_NAME, name);
    }
    if !serial.is_empty() {
        write_descriptor(90, TAG_SERIAL, serial);
    }
    edid
}
