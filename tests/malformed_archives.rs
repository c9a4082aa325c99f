//! Corrupt, truncated and hostile inputs.

mod common;

use common::{ZipBuilder, deflate, flat_archive};
use memunzip::ZipArchive;
use memunzip::zip::ZipError;

fn open_err(bytes: Vec<u8>) -> ZipError {
    ZipArchive::new(bytes).unwrap_err()
}

#[test]
fn empty_buffer_is_format_error() {
    assert!(matches!(open_err(Vec::new()), ZipError::Format(_)));
}

#[test]
fn buffer_without_trailer_is_format_error() {
    let err = open_err(vec![0x42; 4096]);
    assert!(err.is_format());
    assert!(err.to_string().contains("not a valid archive"));
}

#[test]
fn truncated_archive_is_rejected() {
    let bytes = flat_archive();
    for cut in [1, 10, 21, 40] {
        let truncated = bytes[..bytes.len() - cut].to_vec();
        assert!(open_err(truncated).is_format(), "cut {}", cut);
    }
}

#[test]
fn trailer_only_empty_archive_opens() {
    let archive = ZipArchive::new(ZipBuilder::new().build()).unwrap();
    assert!(archive.is_empty());
    assert!(archive.list_entries().is_empty());
}

#[test]
fn corrupt_central_directory_signature() {
    let mut bytes = flat_archive();
    let cd_offset = u32::from_le_bytes(bytes[bytes.len() - 6..bytes.len() - 2].try_into().unwrap());
    bytes[cd_offset as usize] = b'X';
    assert!(matches!(open_err(bytes), ZipError::Format(_)));
}

#[test]
fn inflated_entry_count_overruns_buffer() {
    let mut bytes = flat_archive();
    let len = bytes.len();
    // total entries field of the trailer
    bytes[len - 12..len - 10].copy_from_slice(&500u16.to_le_bytes());
    assert!(open_err(bytes).is_format());
}

#[test]
fn corrupt_local_header_fails_only_that_entry() {
    let mut bytes = flat_archive();
    // file1.txt's local header is at offset 0
    bytes[0] = b'X';
    let archive = ZipArchive::new(bytes).unwrap();

    let err = archive.extract("file1.txt").unwrap_err();
    assert!(matches!(err, ZipError::Format(_)));

    assert_eq!(
        archive.read_to_vec("file2.txt").unwrap().unwrap(),
        b"This is file number 2"
    );
}

#[test]
fn local_header_offset_outside_buffer() {
    let bytes = ZipBuilder::new().stored("a.txt", b"abc").build();
    let mut bytes = bytes;
    let len = bytes.len();
    let cd_offset = u32::from_le_bytes(bytes[len - 6..len - 2].try_into().unwrap()) as usize;
    // relative offset of local header field inside the central record
    bytes[cd_offset + 42..cd_offset + 46].copy_from_slice(&0x00FF_FFFFu32.to_le_bytes());

    let archive = ZipArchive::new(bytes).unwrap();
    assert!(archive.extract("a.txt").unwrap_err().is_format());
}

#[test]
fn compressed_size_past_end_of_buffer() {
    let bytes = ZipBuilder::new()
        .stored("a.txt", b"abc")
        .with_last(|f| f.payload = b"abc".to_vec())
        .build();
    let mut bytes = bytes;
    let len = bytes.len();
    let cd_offset = u32::from_le_bytes(bytes[len - 6..len - 2].try_into().unwrap()) as usize;
    bytes[cd_offset + 20..cd_offset + 24].copy_from_slice(&100_000u32.to_le_bytes());

    let archive = ZipArchive::new(bytes).unwrap();
    assert!(archive.extract("a.txt").unwrap_err().is_format());
}

#[test]
fn checksum_mismatch_detected() {
    let bytes = ZipBuilder::new()
        .deflated("bad.txt", b"some text to squeeze")
        .with_last(|f| f.crc32 = 0xDEAD_BEEF)
        .build();
    let archive = ZipArchive::new(bytes).unwrap();

    let err = archive.read_to_vec("bad.txt").unwrap_err();
    assert!(matches!(
        err,
        ZipError::ChecksumMismatch {
            expected: 0xDEAD_BEEF,
            ..
        }
    ));
}

#[test]
fn truncated_deflate_stream_is_format_error() {
    let data = b"A reasonably long line that deflate will actually encode.".repeat(20);
    let mut payload = deflate(&data);
    payload.truncate(payload.len() / 2);
    let bytes = ZipBuilder::new()
        .raw("cut.txt", 8, &data, payload)
        .build();
    let archive = ZipArchive::new(bytes).unwrap();

    assert!(archive.read_to_vec("cut.txt").unwrap_err().is_format());
}
