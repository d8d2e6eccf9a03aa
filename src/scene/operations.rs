//! Scene extraction
//!
//! Load a scene, run the codecs its markers call for, and write every
//! accepted character as a standalone card. One bad record never stops the
//! rest; only failures to load the scene itself are returned as errors.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::detection::{detect_scene, SceneKind};
use super::naming::{file_stem, timestamp};
use super::types::*;
use crate::aishoujo::AisCodec;
use crate::chara::{CardCodec, Record};
use crate::common::path_security::create_unique_file;
use crate::common::SceneBuffer;
use crate::error::{CardError, Result};
use crate::honeyselect::HoneySelectCodec;
use crate::koikatu::KoikatuCodec;
use crate::playhome::PlayHomeCodec;

/// Extension of every written card
const CARD_EXTENSION: &str = "png";

/// One located record, decoded or not
#[derive(Debug)]
pub struct ScannedRecord {
    pub offset: u64,
    pub record: Result<Record>,
}

/// Run `codec` over the buffer when its markers are present.
fn collect<C>(codec: &C, buffer: &SceneBuffer, out: &mut Vec<ScannedRecord>)
where
    C: CardCodec,
    C::Card: Into<Record>,
{
    if !codec.applies_to(buffer) {
        return;
    }
    let report = codec.scan(buffer);
    debug!(format = C::FORMAT, decoded = report.cards.len(), failed = report.failures.len(), "Scan finished");

    out.extend(report.cards.into_iter().map(|located| ScannedRecord {
        offset: located.offset,
        record: Ok(located.card.into()),
    }));
    out.extend(report.failures.into_iter().map(|failure| ScannedRecord {
        offset: failure.offset,
        record: Err(failure.error),
    }));
}

/// Locate and decode every record in a loaded scene.
pub fn scan_scene(buffer: &SceneBuffer, full: bool) -> Vec<ScannedRecord> {
    let mut scanned = Vec::new();
    match detect_scene(buffer, full) {
        SceneKind::PlayHome => collect(&PlayHomeCodec, buffer, &mut scanned),
        SceneKind::Studio => {
            collect(&AisCodec, buffer, &mut scanned);
            collect(&HoneySelectCodec, buffer, &mut scanned);
            collect(&KoikatuCodec, buffer, &mut scanned);
        }
        SceneKind::Unknown => debug!("No scene marker found"),
    }
    scanned
}

/// Extract the characters of the scene file at `path`.
#[instrument(skip(options), fields(path = %path.display()))]
pub fn extract_scene(path: &Path, options: &ExtractOptions) -> Result<ExtractSummary> {
    let buffer = SceneBuffer::open(path)?;
    extract_buffer(&buffer, options)
}

/// Extract the characters of a scene already in memory.
#[instrument(skip_all, fields(size = bytes.len()))]
pub fn extract_from_bytes(bytes: Vec<u8>, options: &ExtractOptions) -> Result<ExtractSummary> {
    let buffer = SceneBuffer::from_bytes(bytes)?;
    extract_buffer(&buffer, options)
}

fn extract_buffer(buffer: &SceneBuffer, options: &ExtractOptions) -> Result<ExtractSummary> {
    let scanned = scan_scene(buffer, options.full);
    if !options.dry_run && scanned.iter().any(|s| s.record.is_ok()) {
        fs::create_dir_all(&options.output_dir)?;
    }

    let mut summary = ExtractSummary::default();
    for ScannedRecord { offset, record } in scanned {
        let info = match record {
            Ok(record) => process_record(offset, &record, options),
            Err(error) => {
                report_failure(offset, &error, options);
                RecordInfo {
                    offset,
                    format: None,
                    sex: None,
                    name: String::new(),
                    outcome: RecordOutcome::Failed,
                    path: None,
                    error: Some(error.to_string()),
                }
            }
        };
        summary.push(info);
    }

    info!(found = summary.found, written = summary.written, failed = summary.failed(), "Scene extracted");
    Ok(summary)
}

fn process_record(offset: u64, record: &Record, options: &ExtractOptions) -> RecordInfo {
    let mut info = RecordInfo {
        offset,
        format: Some(record.format()),
        sex: Some(record.sex()),
        name: record.name(),
        outcome: RecordOutcome::Listed,
        path: None,
        error: None,
    };

    if !options.sex_filter.allows(record.sex()) {
        debug!(offset, sex = %record.sex(), "Filtered out");
        info.outcome = RecordOutcome::Filtered;
        return info;
    }
    if options.dry_run {
        return info;
    }

    match write_record(record, &options.output_dir) {
        Ok(path) => {
            info!(path = %path.display(), format = %record.format(), sex = %record.sex(), "Card written");
            info.outcome = RecordOutcome::Written;
            info.path = Some(path);
        }
        Err(error) => {
            report_failure(offset, &error, options);
            info.outcome = RecordOutcome::Failed;
            info.error = Some(error.to_string());
        }
    }
    info
}

fn write_record(record: &Record, dir: &Path) -> Result<PathBuf> {
    let bytes = record.encode()?;
    let stem = file_stem(record, &timestamp(chrono::Local::now()));
    let (path, file) = create_unique_file(dir, &stem, CARD_EXTENSION)?;
    fill_card(&path, file, &bytes)?;
    Ok(path)
}

/// Write `bytes` to the freshly created card at `path`, removing it again
/// if the write fails.
fn fill_card<W: Write>(path: &Path, mut out: W, bytes: &[u8]) -> Result<()> {
    let written = out.write_all(bytes).and_then(|()| out.flush());
    drop(out);
    if let Err(e) = written {
        discard_partial(path);
        return Err(e.into());
    }
    Ok(())
}

/// Remove a card file whose write failed part way.
fn discard_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed partial card"),
        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove partial card"),
    }
}

fn report_failure(offset: u64, error: &CardError, options: &ExtractOptions) {
    if options.verbose_errors {
        warn!(offset, error = ?error, "Record failed");
    } else {
        warn!(offset, %error, "Record failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chara::Sex;
    use crate::common::make_preview_image;
    use tempfile::TempDir;

    #[test]
    fn test_no_markers_finds_nothing() {
        let mut data = make_preview_image(2, 2, Sex::Male).unwrap();
        data.extend_from_slice(b"plain trailing bytes");
        let dir = TempDir::new().unwrap();
        let options = ExtractOptions {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let summary = extract_from_bytes(data, &options).unwrap();
        assert_eq!((summary.found, summary.written), (0, 0));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_not_an_image_is_fatal() {
        let options = ExtractOptions::default();
        assert!(matches!(
            extract_from_bytes(b"GIF89a".to_vec(), &options),
            Err(CardError::NotAnImageFile)
        ));
    }

    #[test]
    fn test_broken_record_is_counted_and_skipped() {
        let mut data = make_preview_image(2, 2, Sex::Male).unwrap();
        data.extend_from_slice("【StudioNEOV2】".as_bytes());
        // product number 1, then a marker whose body is cut short
        data.extend_from_slice(&1i32.to_le_bytes());
        data.push("【AIS_Chara】".len() as u8);
        data.extend_from_slice("【AIS_Chara】".as_bytes());
        data.extend_from_slice(&[0x05, b'0']);
        let dir = TempDir::new().unwrap();
        let options = ExtractOptions {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let summary = extract_from_bytes(data, &options).unwrap();
        assert_eq!(summary.found, 1);
        assert_eq!(summary.written, 0);
        assert_eq!(summary.failed(), 1);
        assert!(summary.records[0].error.is_some());
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_removes_partial_card() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("card.png");
        fs::write(&path, b"partial").unwrap();

        let result = fill_card(&path, FullDisk, b"card bytes");
        assert!(matches!(result, Err(CardError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_fill_card_keeps_written_file() {
        let dir = TempDir::new().unwrap();
        let (path, file) = create_unique_file(dir.path(), "card", CARD_EXTENSION).unwrap();
        fill_card(&path, file, b"card bytes").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"card bytes");
    }

    fn playhome_scene(roots: &[crate::playhome::test_support::Node]) -> Vec<u8> {
        let mut data = make_preview_image(2, 2, Sex::Female).unwrap();
        data.extend(crate::playhome::test_support::scene_payload("1.0.0", roots));
        data.extend_from_slice(crate::playhome::PH_STUDIO_MARKER.as_bytes());
        data
    }

    fn written_names(summary: &ExtractSummary) -> Vec<String> {
        summary
            .records
            .iter()
            .filter_map(|r| r.path.as_ref())
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_playhome_cards_named_after_characters() {
        use crate::playhome::test_support::Node;

        let data = playhome_scene(&[
            Node::Character { scene_sex: 1, female: true, name: "Yuuko", children: vec![] },
            Node::Character { scene_sex: 0, female: false, name: "", children: vec![] },
        ]);
        let dir = TempDir::new().unwrap();
        let options = ExtractOptions {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let summary = extract_from_bytes(data, &options).unwrap();
        assert_eq!((summary.found, summary.written), (2, 2));
        assert!(dir.path().join("Yuuko.png").exists());
        let unnamed = summary.records[1].path.as_ref().unwrap();
        let stem = unnamed.file_stem().unwrap().to_string_lossy();
        assert_eq!(stem.len(), 17);
        assert!(stem.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(summary.per_format["PlayHome"], 2);
    }

    #[test]
    fn test_playhome_name_collisions_and_dotted_names() {
        use crate::playhome::test_support::Node;

        let girl = |name| Node::Character { scene_sex: 1, female: true, name, children: vec![] };
        let data = playhome_scene(&[
            girl("Yuuko"),
            girl("Yuuko"),
            girl("Mr..X"),
            girl("Yuuko"),
            girl("100%2fcute"),
            girl("../up"),
        ]);
        let dir = TempDir::new().unwrap();
        let options = ExtractOptions {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let summary = extract_from_bytes(data, &options).unwrap();
        assert_eq!((summary.found, summary.written), (6, 6));
        assert_eq!(
            written_names(&summary),
            ["Yuuko.png", "Yuuko-1.png", "Mr..X.png", "Yuuko-2.png", "100%2fcute.png", "_up.png"]
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 6);
    }

    #[test]
    fn test_playhome_sex_filter_uses_native_tag() {
        use crate::playhome::test_support::Node;

        let data = playhome_scene(&[
            Node::Character { scene_sex: 1, female: true, name: "Hanako", children: vec![] },
            Node::Character { scene_sex: 0, female: false, name: "Taro", children: vec![] },
        ]);

        for (filter, kept, dropped) in [
            (SexFilter::MaleOnly, "Taro", "Hanako"),
            (SexFilter::FemaleOnly, "Hanako", "Taro"),
        ] {
            let dir = TempDir::new().unwrap();
            let options = ExtractOptions {
                sex_filter: filter,
                output_dir: dir.path().to_path_buf(),
                ..Default::default()
            };
            let summary = extract_from_bytes(data.clone(), &options).unwrap();
            assert_eq!((summary.found, summary.written), (2, 1), "{filter:?}");
            assert_eq!(written_names(&summary), [format!("{kept}.png")]);

            let filtered = summary.records.iter().find(|r| r.name == dropped).unwrap();
            assert_eq!(filtered.outcome, RecordOutcome::Filtered);
            assert!(!dir.path().join(format!("{dropped}.png")).exists());
        }
    }
}
