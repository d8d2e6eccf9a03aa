// Placeholder preview images for extracted cards
//
// The games show the leading PNG as the card thumbnail; its contents are
// never parsed, so a flat colour keyed on sex is enough.

use crate::chara::Sex;
use crate::error::Result;

/// Card thumbnail width used by every format
pub const PREVIEW_WIDTH: u32 = 252;
/// Card thumbnail height used by every format
pub const PREVIEW_HEIGHT: u32 = 352;

const MALE_COLOR: [u8; 4] = [0, 0, 255, 255];
const FEMALE_COLOR: [u8; 4] = [255, 128, 255, 255];

/// Flat colour for a given sex; unknown uses the female colour
pub fn preview_color(sex: Sex) -> [u8; 4] {
    match sex {
        Sex::Male => MALE_COLOR,
        _ => FEMALE_COLOR,
    }
}

/// Encode a `width` x `height` RGBA PNG filled with the colour for `sex`.
pub fn make_preview_image(width: u32, height: u32, sex: Sex) -> Result<Vec<u8>> {
    let color = preview_color(sex);
    let pixels: Vec<u8> = color
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * 4)
        .collect();

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Default);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
        writer.finish()?;
    }
    Ok(out)
}

/// Standard-size thumbnail for `sex`
pub fn card_preview(sex: Sex) -> Result<Vec<u8>> {
    make_preview_image(PREVIEW_WIDTH, PREVIEW_HEIGHT, sex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::magic::{is_png, payload_offset};

    #[test]
    fn test_preview_is_complete_png() {
        let png = make_preview_image(4, 3, Sex::Male).unwrap();
        assert!(is_png(&png));
        assert_eq!(payload_offset(&png).unwrap(), png.len() as u64);
    }

    #[test]
    fn test_preview_colors() {
        assert_eq!(preview_color(Sex::Male), [0, 0, 255, 255]);
        assert_eq!(preview_color(Sex::Female), [255, 128, 255, 255]);
        assert_eq!(preview_color(Sex::Unknown(7)), [255, 128, 255, 255]);
    }

    #[test]
    fn test_preview_decodes_to_requested_size() {
        let png = card_preview(Sex::Female).unwrap();
        let decoder = png::Decoder::new(std::io::Cursor::new(png));
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, PREVIEW_WIDTH);
        assert_eq!(reader.info().height, PREVIEW_HEIGHT);
    }
}
