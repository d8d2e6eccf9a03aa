//! PlayHome custom parameter (appearance) decoding.
//!
//! The five appearance blocks are copied out field by field and rewritten
//! into the version 10 layout, so a card extracted from an old scene loads
//! in the current game.

use tracing::trace;

use super::color::{pass, put_floats, read_color, write_default_color, ColorKind, ALLOY_HSV_DEFAULT};
use super::types::CustomParameter;
use crate::common::binary::{ByteCursor, ByteWriter};
use crate::error::{CardError, Result};

/// Native sex tag for female characters (male is 1)
pub const NATIVE_FEMALE: i32 = 0;

/// Custom parameter version written by the encoder
pub const NORMALIZED_VERSION: i32 = 10;

const WEAR_SLOTS: usize = 11;
const ACCESSORY_SLOTS: usize = 10;

/// Manicure colour for cards that predate it
const MANICURE_DEFAULT: [f32; 10] = [1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0];
/// Eye highlight colour for male cards below version 2
const EYE_HIGHLIGHT_DEFAULT: [f32; 10] = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0];
/// Areola size, bust softness, bust weight
const BUST_DEFAULT: [f32; 3] = [0.5, 0.5, 0.5];
const EYE_PUPIL_EMISSIVE_DEFAULT: [f32; 2] = [0.0, 0.5];
const EYE_EMISSIVE_DEFAULT: f32 = 0.5;

/// Read `version`, native sex and the five appearance blocks.
pub fn read_custom_parameter(cursor: &mut ByteCursor<'_>) -> Result<CustomParameter> {
    let version = cursor.read_i32()?;
    let native_sex = cursor.read_i32()?;
    let female = native_sex == NATIVE_FEMALE;
    trace!(version, native_sex, offset = cursor.position(), "Custom parameter");

    let hair = block(|out| read_hair(cursor, version, out))?;
    let head = block(|out| read_head(cursor, version, female, out))?;
    let body = block(|out| read_body(cursor, version, female, out))?;
    let wear = block(|out| read_wear(cursor, version, female, out))?;
    let accessory = block(|out| read_accessory(cursor, version, out))?;

    Ok(CustomParameter {
        version,
        native_sex,
        hair,
        head,
        body,
        wear,
        accessory,
    })
}

fn block<F>(read: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut ByteWriter) -> Result<()>,
{
    let mut out = ByteWriter::new();
    read(&mut out)?;
    Ok(out.into_inner())
}

/// Shape values: i32 count then `count` f32s
fn read_shapes(c: &mut ByteCursor<'_>, out: &mut ByteWriter) -> Result<()> {
    let count = c.read_count()?;
    out.write_count(count)?;
    let len = count
        .checked_mul(4)
        .ok_or_else(|| CardError::InvalidData(format!("shape count {count} too large")))?;
    pass(c, out, len)
}

fn read_hair(c: &mut ByteCursor<'_>, version: i32, out: &mut ByteWriter) -> Result<()> {
    let parts = c.read_count()?;
    out.write_count(parts)?;
    for _ in 0..parts {
        pass(c, out, 4)?; // part id
        read_color(ColorKind::Hair, c, version, out)?;
        if version > 0 {
            read_color(ColorKind::Pbr1, c, version, out)?;
        } else {
            // no accessory colour: flag 0
            out.write_i32(0);
        }
    }
    Ok(())
}

fn read_head(c: &mut ByteCursor<'_>, version: i32, female: bool, out: &mut ByteWriter) -> Result<()> {
    // head, face texture, detail id + weight, eyebrow id
    pass(c, out, 20)?;
    read_color(ColorKind::Pbr1, c, version, out)?;

    if version < 4 {
        // One sclera colour shared by both eyes, stored before the eye ids
        let sclera = c.read_bytes(16)?;
        for _ in 0..2 {
            pass(c, out, 4)?; // eye id
            out.write_bytes(sclera);
            pass(c, out, 16)?; // iris
            put_floats(out, &EYE_PUPIL_EMISSIVE_DEFAULT);
        }
    } else {
        for _ in 0..2 {
            // eye id, sclera, iris, pupil dilation
            pass(c, out, 40)?;
            if version >= 10 {
                pass(c, out, 4)?;
            } else {
                out.write_f32(EYE_EMISSIVE_DEFAULT);
            }
        }
    }

    pass(c, out, 20)?; // tattoo id + colour
    read_shapes(c, out)?;

    if female {
        pass(c, out, 4)?; // eyelash id
        read_color(ColorKind::Pbr1, c, version, out)?;
        pass(c, out, 80)?; // eyeshadow, cheek, lip, mole
        pass(c, out, 4)?; // eye highlight id
        read_color(ColorKind::EyeHighlight, c, version, out)?;
    } else {
        pass(c, out, 20)?; // beard
        if version >= 2 {
            read_color(ColorKind::EyeHighlight, c, version, out)?;
        } else {
            write_default_color(ColorKind::EyeHighlight, &EYE_HIGHLIGHT_DEFAULT, out);
        }
    }
    Ok(())
}

fn read_body(c: &mut ByteCursor<'_>, version: i32, female: bool, out: &mut ByteWriter) -> Result<()> {
    pass(c, out, 4)?; // body id
    read_color(ColorKind::AlloyHsv, c, version, out)?; // skin
    pass(c, out, 12)?; // detail id + weight, underhair id
    read_color(ColorKind::Alloy, c, version, out)?; // underhair
    pass(c, out, 20)?; // tattoo id + colour
    read_shapes(c, out)?;

    if !female {
        return Ok(());
    }

    pass(c, out, 4)?; // nipple id
    read_color(ColorKind::AlloyHsv, c, version, out)?;
    pass(c, out, 20)?; // sunburn id + colour

    if version >= 3 {
        read_color(ColorKind::AlloyHsv, c, version, out)?; // nail
        if version >= 9 {
            read_color(ColorKind::Pbr1, c, version, out)?;
        } else {
            write_default_color(ColorKind::Pbr1, &MANICURE_DEFAULT, out);
        }
        pass(c, out, 12)?; // areola size, bust softness, bust weight
    } else {
        write_default_color(ColorKind::AlloyHsv, &ALLOY_HSV_DEFAULT, out);
        write_default_color(ColorKind::Pbr1, &MANICURE_DEFAULT, out);
        put_floats(out, &BUST_DEFAULT);
    }
    Ok(())
}

fn read_wear(c: &mut ByteCursor<'_>, version: i32, female: bool, out: &mut ByteWriter) -> Result<()> {
    for _ in 0..WEAR_SLOTS {
        pass(c, out, 8)?; // wear type, id
        read_color(ColorKind::Pbr2, c, version, out)?;
    }
    if female {
        pass(c, out, 3)?; // swimwear flags
    }
    Ok(())
}

fn read_accessory(c: &mut ByteCursor<'_>, version: i32, out: &mut ByteWriter) -> Result<()> {
    for _ in 0..ACCESSORY_SLOTS {
        // type, id, attach point, position, rotation, scale
        pass(c, out, 48)?;
        read_color(ColorKind::Pbr2, c, version, out)?;
    }
    Ok(())
}

/// Append a normalized parameter: version 10, native sex, blocks.
pub fn write_custom_parameter(custom: &CustomParameter, w: &mut ByteWriter) {
    w.write_i32(NORMALIZED_VERSION);
    w.write_i32(custom.native_sex);
    w.write_bytes(&custom.hair);
    w.write_bytes(&custom.head);
    w.write_bytes(&custom.body);
    w.write_bytes(&custom.wear);
    w.write_bytes(&custom.accessory);
}
