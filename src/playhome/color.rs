//! PlayHome colour blocks
//!
//! Each colour kind changed layout over the custom-parameter versions. Every
//! decoder rewrites its block into the version 10 layout, filling fields the
//! source version lacked with the game's defaults. The output always starts
//! with the kind tag.
//!
//! | kind          | tag | normalized payload        |
//! |---------------|-----|---------------------------|
//! | hair          | 1   | 56 bytes                  |
//! | pbr1          | 2   | 40 bytes                  |
//! | pbr2          | 3   | 80 bytes                  |
//! | alloy         | 4   | 24 bytes                  |
//! | alloy + hsv   | 5   | 24 bytes                  |
//! | eye highlight | 7   | 40 bytes                  |

use crate::common::binary::{ByteCursor, ByteWriter};
use crate::error::{CardError, Result};

/// First custom-parameter version using the flagged colour layout
pub const CURRENT_COLOR_VERSION: i32 = 4;

/// Bytes of a legacy main colour (RGBA f32)
const LEGACY_MAIN_LEN: usize = 16;

const HAIR_LEGACY_TAIL: [f32; 10] = [0.75, 0.75, 0.75, 1.0, 6.0, 0.75, 0.75, 0.75, 1.0, 0.3];
const PBR1_LEGACY_TAIL: [f32; 6] = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0];
const PBR1_DEFAULT: [f32; 10] = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0];
const PBR2_LEGACY_TAIL: [f32; 16] = [
    1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0,
];
const PBR2_DEFAULT: [f32; 20] = [
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
    0.0,
];
const ALLOY_LEGACY_TAIL: [f32; 2] = [0.0, 0.0];
const ALLOY_DEFAULT: [f32; 6] = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0];
/// HSV offset + alpha, metallic, smooth
pub const ALLOY_HSV_DEFAULT: [f32; 6] = [0.0, 1.0, 1.0, 1.0, 0.0, 0.562];
const HSV_OFFSET_DEFAULT: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

/// Colour block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKind {
    Hair,
    Pbr1,
    Pbr2,
    Alloy,
    AlloyHsv,
    EyeHighlight,
}

impl ColorKind {
    pub fn tag(self) -> i32 {
        match self {
            ColorKind::Hair => 1,
            ColorKind::Pbr1 => 2,
            ColorKind::Pbr2 => 3,
            ColorKind::Alloy => 4,
            ColorKind::AlloyHsv => 5,
            ColorKind::EyeHighlight => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Generation {
    Legacy,
    Current,
}

impl Generation {
    fn of(version: i32) -> Self {
        if version < CURRENT_COLOR_VERSION {
            Generation::Legacy
        } else {
            Generation::Current
        }
    }
}

type ColorDecoder = fn(&mut ByteCursor<'_>, i32, &mut ByteWriter) -> Result<()>;

const COLOR_DECODERS: [(ColorKind, Generation, ColorDecoder); 12] = [
    (ColorKind::Hair, Generation::Legacy, hair_legacy as ColorDecoder),
    (ColorKind::Hair, Generation::Current, hair_current as ColorDecoder),
    (ColorKind::Pbr1, Generation::Legacy, pbr1_legacy as ColorDecoder),
    (ColorKind::Pbr1, Generation::Current, pbr1_current as ColorDecoder),
    (ColorKind::Pbr2, Generation::Legacy, pbr2_legacy as ColorDecoder),
    (ColorKind::Pbr2, Generation::Current, pbr2_current as ColorDecoder),
    (ColorKind::Alloy, Generation::Legacy, alloy_legacy as ColorDecoder),
    (ColorKind::Alloy, Generation::Current, alloy_current as ColorDecoder),
    (ColorKind::AlloyHsv, Generation::Legacy, alloy_hsv_legacy as ColorDecoder),
    (ColorKind::AlloyHsv, Generation::Current, alloy_hsv_current as ColorDecoder),
    (ColorKind::EyeHighlight, Generation::Legacy, pbr1_legacy as ColorDecoder),
    (ColorKind::EyeHighlight, Generation::Current, pbr1_current as ColorDecoder),
];

/// Read one colour block of `kind` and append its normalized form to `out`.
pub fn read_color(
    kind: ColorKind,
    cursor: &mut ByteCursor<'_>,
    version: i32,
    out: &mut ByteWriter,
) -> Result<()> {
    let generation = Generation::of(version);
    let decoder = COLOR_DECODERS
        .iter()
        .find(|(k, g, _)| *k == kind && *g == generation)
        .map(|(_, _, decoder)| *decoder)
        .ok_or_else(|| CardError::InvalidData(format!("no decoder for {kind:?} colour")))?;
    out.write_i32(kind.tag());
    decoder(cursor, version, out)
}

/// Append a tagged colour block made only of default values.
pub fn write_default_color(kind: ColorKind, values: &[f32], out: &mut ByteWriter) {
    out.write_i32(kind.tag());
    put_floats(out, values);
}

// =============================================================================
// Helpers
// =============================================================================

/// Copy `n` bytes straight through
pub(crate) fn pass(cursor: &mut ByteCursor<'_>, out: &mut ByteWriter, n: usize) -> Result<()> {
    out.write_bytes(cursor.read_bytes(n)?);
    Ok(())
}

pub(crate) fn put_floats(out: &mut ByteWriter, values: &[f32]) {
    for v in values {
        out.write_f32(*v);
    }
}

// =============================================================================
// Legacy (< 4): a bare RGBA main colour, everything else defaulted
// =============================================================================

fn hair_legacy(c: &mut ByteCursor<'_>, _version: i32, out: &mut ByteWriter) -> Result<()> {
    pass(c, out, LEGACY_MAIN_LEN)?;
    put_floats(out, &HAIR_LEGACY_TAIL);
    Ok(())
}

fn pbr1_legacy(c: &mut ByteCursor<'_>, _version: i32, out: &mut ByteWriter) -> Result<()> {
    pass(c, out, LEGACY_MAIN_LEN)?;
    put_floats(out, &PBR1_LEGACY_TAIL);
    Ok(())
}

fn pbr2_legacy(c: &mut ByteCursor<'_>, _version: i32, out: &mut ByteWriter) -> Result<()> {
    pass(c, out, LEGACY_MAIN_LEN)?;
    put_floats(out, &PBR2_LEGACY_TAIL);
    Ok(())
}

fn alloy_legacy(c: &mut ByteCursor<'_>, _version: i32, out: &mut ByteWriter) -> Result<()> {
    pass(c, out, LEGACY_MAIN_LEN)?;
    put_floats(out, &ALLOY_LEGACY_TAIL);
    Ok(())
}

fn alloy_hsv_legacy(c: &mut ByteCursor<'_>, _version: i32, out: &mut ByteWriter) -> Result<()> {
    // Old RGBA skin colour has no HSV meaning; start from neutral offsets
    c.skip(LEGACY_MAIN_LEN)?;
    put_floats(out, &ALLOY_HSV_DEFAULT);
    Ok(())
}

// =============================================================================
// Current (>= 4): a flag int, then the stored fields or nothing
// =============================================================================

fn hair_current(c: &mut ByteCursor<'_>, _version: i32, out: &mut ByteWriter) -> Result<()> {
    c.read_i32()?;
    // main, cuticle colour + exponent, fresnel colour + exponent
    pass(c, out, 56)
}

fn pbr1_current(c: &mut ByteCursor<'_>, _version: i32, out: &mut ByteWriter) -> Result<()> {
    if c.read_i32()? != 0 {
        pass(c, out, 40)
    } else {
        put_floats(out, &PBR1_DEFAULT);
        Ok(())
    }
}

fn pbr2_current(c: &mut ByteCursor<'_>, version: i32, out: &mut ByteWriter) -> Result<()> {
    if c.read_i32()? == 0 {
        put_floats(out, &PBR2_DEFAULT);
        return Ok(());
    }
    pass(c, out, 72)?;
    if version >= 5 {
        pass(c, out, 4)?; // specular2
    } else {
        out.write_f32(0.0);
    }
    pass(c, out, 4) // smooth2
}

fn alloy_current(c: &mut ByteCursor<'_>, _version: i32, out: &mut ByteWriter) -> Result<()> {
    if c.read_i32()? != 0 {
        pass(c, out, 24)
    } else {
        put_floats(out, &ALLOY_DEFAULT);
        Ok(())
    }
}

fn alloy_hsv_current(c: &mut ByteCursor<'_>, version: i32, out: &mut ByteWriter) -> Result<()> {
    if c.read_i32()? == 0 {
        put_floats(out, &ALLOY_HSV_DEFAULT);
        return Ok(());
    }

    if version < 6 {
        c.skip(16)?;
        put_floats(out, &HSV_OFFSET_DEFAULT);
    } else {
        pass(c, out, 12)?; // h, s, v offsets
        match version {
            7 => {
                c.skip(1)?;
                pass(c, out, 4)?;
            }
            v if v >= 8 => pass(c, out, 4)?,
            _ => out.write_f32(1.0),
        }
    }
    pass(c, out, 8) // metallic, smooth
}
