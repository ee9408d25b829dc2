// Integration tests for the file store: extension filtering, listing
// order, result document loading, and read safety.

use anyhow::Result;
use tempfile::TempDir;
use voice_notes::store::READ_ERROR_PLACEHOLDER;
use voice_notes::FileStore;

#[test]
fn listing_excludes_disallowed_extensions() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path())?;

    std::fs::write(dir.path().join("20240101-120000-aaaa.wav"), b"wav")?;
    std::fs::write(dir.path().join("20240101-120000-aaaa.wav.txt"), "doc")?;
    std::fs::write(dir.path().join("notes.md"), "markdown")?;
    std::fs::write(dir.path().join("archive.zip"), b"zip")?;

    let files = store.list()?;
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.ends_with(".wav") || f.ends_with(".txt")));

    Ok(())
}

#[test]
fn listing_is_descending_by_filename() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path())?;

    std::fs::write(dir.path().join("20240101-090000-aaaa.wav"), b"a")?;
    std::fs::write(dir.path().join("20240102-090000-aaaa.wav"), b"b")?;
    std::fs::write(dir.path().join("20240101-230000-aaaa.wav"), b"c")?;

    let files = store.list()?;
    assert_eq!(
        files,
        vec![
            "20240102-090000-aaaa.wav",
            "20240101-230000-aaaa.wav",
            "20240101-090000-aaaa.wav",
        ]
    );

    Ok(())
}

#[test]
fn listing_loads_text_contents_only() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path())?;

    std::fs::write(dir.path().join("20240101-120000-aaaa.wav"), b"audio")?;
    std::fs::write(
        dir.path().join("20240101-120000-aaaa.wav.txt"),
        "hello\nSentiment Analysis:\n",
    )?;

    let listing = store.listing()?;
    assert_eq!(listing.len(), 2);

    let txt = listing
        .iter()
        .find(|f| f.name.ends_with(".txt"))
        .expect("txt entry present");
    assert_eq!(txt.contents.as_deref(), Some("hello\nSentiment Analysis:\n"));

    let wav = listing
        .iter()
        .find(|f| f.name.ends_with(".wav"))
        .expect("wav entry present");
    assert!(wav.contents.is_none());

    Ok(())
}

#[test]
fn unreadable_text_file_degrades_to_placeholder() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path())?;

    // A directory with a .txt name fails read_to_string but must not fail
    // the whole listing.
    std::fs::create_dir(dir.path().join("broken.txt"))?;
    std::fs::write(dir.path().join("20240101-120000-aaaa.wav.txt"), "ok")?;

    let listing = store.listing()?;
    let broken = listing
        .iter()
        .find(|f| f.name == "broken.txt")
        .expect("broken entry listed");
    assert_eq!(broken.contents.as_deref(), Some(READ_ERROR_PLACEHOLDER));

    let good = listing
        .iter()
        .find(|f| f.name == "20240101-120000-aaaa.wav.txt")
        .expect("good entry listed");
    assert_eq!(good.contents.as_deref(), Some("ok"));

    Ok(())
}

#[test]
fn read_round_trips_stored_bytes() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path())?;

    let bytes = vec![0u8, 1, 2, 3, 255, 254];
    store.save_recording("20240101-120000-aaaa.wav", &bytes)?;

    let read = store.read("20240101-120000-aaaa.wav")?.expect("file exists");
    assert_eq!(read, bytes);

    Ok(())
}

#[test]
fn read_refuses_path_traversal() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path())?;

    assert!(store.read("../outside.txt")?.is_none());
    assert!(store.read("nested/inside.wav")?.is_none());
    assert!(store.read("..")?.is_none());

    Ok(())
}

#[test]
fn read_missing_file_is_none() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path())?;

    assert!(store.read("20990101-000000-ffff.wav")?.is_none());

    Ok(())
}

#[test]
fn generated_stamps_do_not_collide_within_a_second() {
    // Stress the generator: a burst of stamps taken as fast as possible
    // lands mostly in the same wall-clock second, and every one must still
    // be unique thanks to the random suffix.
    let stamps: std::collections::HashSet<String> =
        (0..500).map(|_| FileStore::generate_stamp()).collect();
    assert_eq!(stamps.len(), 500);
}
